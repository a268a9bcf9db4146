use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured form of an `ID` attribute value.
///
/// IDs are either a plain `<name>` (e.g. `YEL0W01`) or the three-part
/// `<code>:<name>:<index>` produced by grouping (e.g. `CDS:YEL0W01:2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffId {
    pub code: String,
    pub name: String,
    pub index: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("bad index in ID '{0}'")]
    BadIndex(String),
}

impl FromStr for GffId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items: Vec<&str> = s.split(':').collect();
        if items.len() == 1 {
            return Ok(Self {
                code: String::new(),
                name: s.to_string(),
                index: 0,
            });
        }
        let index = if items.len() > 2 {
            items[2]
                .parse::<u32>()
                .map_err(|_| IdError::BadIndex(s.to_string()))?
        } else {
            0
        };
        Ok(Self {
            code: items[0].to_string(),
            name: items[1].to_string(),
            index,
        })
    }
}

impl fmt::Display for GffId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}:{}", self.code, self.name, self.index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let id: GffId = "YEL0W01".parse().unwrap();
        assert_eq!(id.code, "");
        assert_eq!(id.name, "YEL0W01");
        assert_eq!(id.index, 0);
        assert_eq!(id.to_string(), "YEL0W01");
    }

    #[test]
    fn test_three_part() {
        let id: GffId = "CDS:YEL0W01:2".parse().unwrap();
        assert_eq!(id.code, "CDS");
        assert_eq!(id.name, "YEL0W01");
        assert_eq!(id.index, 2);
        assert_eq!(id.to_string(), "CDS:YEL0W01:2");
    }

    #[test]
    fn test_bad_index() {
        let err = "CDS:YEL0W01:two".parse::<GffId>().unwrap_err();
        assert_eq!(err, IdError::BadIndex("CDS:YEL0W01:two".to_string()));
    }
}
