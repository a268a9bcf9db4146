use gffclean::{run, Config};
use indoc::indoc;
use std::path::{Path, PathBuf};

/// Writes a file to the temporary directory and returns its path.
fn write_temp_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn attribute<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split('\t')
        .nth(8)
        .unwrap()
        .split(';')
        .find_map(|item| item.strip_prefix(&format!("{}=", key)))
}

/// Runs the full --clean pipeline and validates score cleanup, attribute
/// replacement and group ID numbering.
#[test]
fn clean_groups_and_rewrites_ids() {
    let dir = tempfile::tempdir().unwrap();
    let gff = indoc! {"
        ##gff-version 3
        chr1\tTest\tCDS\t28789\t29049\tAnc_2.253\t-\t0\tID=YEL0W01;SGD=YEL0W01;kaks=-le+100
        chr1\tTest\tCDS\t29963\t32155\t\t-\t0\tID=YEL0W02;SGD=YEL0W02
        chr1\tTest\tCDS\t32611\t34140\t0\t-\t0\tID=YEL0W02;SGD=YEL0W02
        chr1\tTest\tCDS\t34525\t35262\t0\t-\t0\tID=YEL0W03;SGD=YEL0W03
        chr1\tTest\tCDS\t35823\t37004\t0\t-\t0\tID=YEL0W03;SGD=YEL0W03
        chr1\tTest\tCDS\t38050\t38120\t0\t-\t0\tID=YEL0W04;SGD=YEL0W04
        chr1\tTest\tCDS\t39195\t39569\t0\t-\t0\tID=YEL0W03;SGD=YEL0W03
        chr1\tTest\tCDS\t40406\t40864\t0\t-\t0\tID=YEL0W01;SGD=YEL0W01
    "};
    let input_path = write_temp_file(dir.path(), "input.gff", gff);
    let output_path = dir.path().join("output.gff");

    let mut config = Config::for_input(input_path);
    config.output = Some(output_path.clone());
    config.clean_score = true;
    config.replace_attributes = true;
    config.exclude_attributes = true;
    config.group_ids = true;

    let stats = run(&config).unwrap();
    assert_eq!(stats.records, 8);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.duplicates, 3);
    assert_eq!(stats.trivial_duplicates, 2);

    let output = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "##gff-version 3");

    let expected_ids = [
        "CDS:YEL0W01:1",
        "CDS:YEL0W02:1",
        "CDS:YEL0W02:2",
        "CDS:YEL0W03:1",
        "CDS:YEL0W03:2",
        "CDS:YEL0W04:1",
        "CDS:YEL0W03:3",
        "CDS:YEL0W01:1",
    ];
    for (line, expected) in lines[1..].iter().zip(expected_ids) {
        assert_eq!(attribute(line, "ID"), Some(expected));
    }

    // blank and Anc_* scores got zeroed, kaks got dropped
    assert_eq!(lines[1].split('\t').nth(5), Some("0"));
    assert_eq!(lines[2].split('\t').nth(5), Some("0"));
    assert!(!lines[1].contains("kaks"));
}

/// A duplicate report lists every duplicated identifier with per-record
/// line references.
#[test]
fn report_duplicates_file() {
    let dir = tempfile::tempdir().unwrap();
    let gff = indoc! {"
        chr1\tTest\tCDS\t28789\t29049\t0\t-\t0\tID=YEL0W01;SGD=YEL0W01
        chr1\tTest\tCDS\t29963\t32155\t0\t-\t0\tID=YEL0W02;SGD=YEL0W02
        chr1\tTest\tCDS\t32611\t34140\t0\t-\t0\tID=YEL0W02;SGD=YEL0W02
        chr1\tTest\tCDS\t34525\t35262\t0\t-\t0\tID=YEL0W03;SGD=YEL0W03
        chr1\tTest\tCDS\t35823\t37004\t0\t-\t0\tID=YEL0W04;SGD=YEL0W04
        chr1\tTest\tCDS\t38050\t38120\t0\t-\t0\tID=YEL0W05;SGD=YEL0W05
        chr1\tTest\tCDS\t39195\t39569\t0\t-\t0\tID=YEL0W05;SGD=YEL0W05
        chr2\tTest\tCDS\t40406\t40864\t0\t+\t0\tID=YEL0W05;SGD=YEL0W05
        chr2\tTest\tCDS\t41402\t41831\t0\t-\t0\tID=YEL0W06;SGD=YEL0W06
    "};
    let input_path = write_temp_file(dir.path(), "input.gff", gff);
    let output_path = dir.path().join("output.gff");

    let mut config = Config::for_input(input_path);
    config.output = Some(output_path.clone());
    config.report_duplicates = true;

    let stats = run(&config).unwrap();
    assert_eq!(stats.duplicates, 2);

    let report = std::fs::read_to_string(dir.path().join("output_duplicates.txt")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "YEL0W02\t\tL2;chr1;29963;32155;-\tL3;chr1;32611;34140;-"
    );
    assert_eq!(
        lines[1],
        "YEL0W05\t\tL6;chr1;38050;38120;-\tL7;chr1;39195;39569;-\tL8;chr2;40406;40864;+"
    );

    // reporting alone never rewrites the records
    let output = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(output.trim_end(), gff.trim_end());
}

/// An empty report is still written, with a placeholder line.
#[test]
fn report_without_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let gff = "chr1\tTest\tCDS\t100\t200\t0\t+\t0\tID=YEL0W01;SGD=YEL0W01\n";
    let input_path = write_temp_file(dir.path(), "input.gff", gff);

    let mut config = Config::for_input(input_path);
    config.output = Some(dir.path().join("output.gff"));
    config.report_duplicates = true;

    let stats = run(&config).unwrap();
    assert_eq!(stats.duplicates, 0);
    let report = std::fs::read_to_string(dir.path().join("output_duplicates.txt")).unwrap();
    assert_eq!(report, "No duplicate identifiers\n");
}

/// Malformed lines are skipped and counted, not fatal.
#[test]
fn malformed_records_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let gff = indoc! {"
        chr1\tTest\tCDS\t100\t200\t0\t+\t0\tID=a;SGD=a
        chr1\tTest\tCDS\tnotanumber\t300\t0\t+\t0\tID=b;SGD=b
        chr1\tTest\tCDS\t400\t500\t0\t+\t0\tID=c;SGD=c
    "};
    let input_path = write_temp_file(dir.path(), "input.gff", gff);
    let output_path = dir.path().join("output.gff");

    let mut config = Config::for_input(input_path);
    config.output = Some(output_path.clone());

    let stats = run(&config).unwrap();
    assert_eq!(stats.records, 2);
    assert_eq!(stats.skipped, 1);

    let output = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(output.lines().count(), 2);
}
