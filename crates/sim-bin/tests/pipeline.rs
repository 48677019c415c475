//! Integration-adjacent test: the full read → symbolize → fill → write
//! pipeline over a temporary input file, without spawning the binary.

use std::io::Write;

use core_config::MeasureConfig;
use core_io::{Format, read_lines, write_matrix};
use core_matrix::{ComputeOptions, Matrix, compute, parse_range};
use core_measures::resolve;
use core_strings::{Delimiters, symbolize_all};

#[test]
fn labeled_lines_to_libsvm_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "1,the quick fox").unwrap();
    writeln!(f, "2,the lazy dog").unwrap();
    writeln!(f, "1,the quick dog").unwrap();
    drop(f);

    let mut strs = read_lines(&path, true).unwrap();
    assert_eq!(strs.len(), 3);
    symbolize_all(&mut strs, &Delimiters::parse(" ").unwrap());

    let mut measure = resolve("sim_jaccard");
    measure.configure(&MeasureConfig::default()).unwrap();

    let mut m = Matrix::new(&strs);
    m.set_x_range(parse_range(":", strs.len()));
    m.set_y_range(parse_range(":", strs.len()));
    m.allocate();
    compute(
        &mut m,
        &strs,
        |a, b| measure.compare(a, b),
        &ComputeOptions::default(),
    )
    .unwrap();

    // {the,quick,fox} vs {the,quick,dog}: 2 shared of 4 distinct.
    assert_eq!(m.get(2, 0), 0.5);
    // {the,quick,fox} vs {the,lazy,dog}: 1 shared of 5 distinct.
    assert_eq!(m.get(1, 0), 0.2);

    let mut buf = Vec::new();
    write_matrix(&m, &mut buf, Format::Libsvm, 2).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "1 1:1.00 2:0.20 3:0.50");
    assert_eq!(lines[1], "2 1:0.20 2:1.00 3:0.50");
    assert_eq!(lines[2], "1 1:0.50 2:0.50 3:1.00");
}
