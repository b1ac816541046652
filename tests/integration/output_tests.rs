use dirdupe::cli::OutputFormat;
use dirdupe::duplicates::DirectoryFinder;
use dirdupe::output::{text, write_report};
use std::fs;
use tempfile::{tempdir, TempDir};

fn report(format: OutputFormat) -> (String, TempDir) {
    let dir = tempdir().unwrap();
    for p in ["2023/raw", "2023/edited", "copy/raw", "copy/edited"] {
        fs::create_dir_all(dir.path().join(p)).unwrap();
    }
    fs::write(dir.path().join("2023/raw/img.dng"), "a").unwrap();
    fs::write(dir.path().join("copy/raw/img.dng"), "b").unwrap();

    let (groups, summary) = DirectoryFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    text::set_color(false);
    let mut buffer = Vec::new();
    write_report(&mut buffer, format, &groups, &summary).unwrap();
    (String::from_utf8(buffer).unwrap(), dir)
}

#[test]
fn test_text_report_for_scan() {
    let (out, dir) = report(OutputFormat::Text);
    let root = dir.path();

    assert!(out.contains("Found 1 duplicate directory group (1 redundant copy)"));
    assert!(out.contains(&format!("★ {}", root.join("2023").display())));
    assert!(out.contains(&format!("○ {}", root.join("copy").display())));
    assert!(out.contains("depth 1, 2 entries"));
}

#[test]
fn test_json_report_for_scan() {
    let (out, dir) = report(OutputFormat::Json);
    let root = dir.path();

    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["duplicates"][0]["directories"][0],
        root.join("2023").to_string_lossy().as_ref()
    );
    assert_eq!(json["duplicates"][0]["entry_count"], 2);
    assert_eq!(json["summary"]["dominated_groups"], 2);
}

#[test]
fn test_csv_report_for_scan() {
    let (out, dir) = report(OutputFormat::Csv);
    let root = dir.path();

    let mut reader = csv::Reader::from_reader(out.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][2], "1");
    assert_eq!(&rows[1][4], root.join("copy").to_string_lossy().as_ref());
}
