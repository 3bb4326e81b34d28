//! Common utilities for E2E tests.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

/// Names of every package member, in archive order.
pub fn part_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Contents of one package member as a string.
pub fn read_part(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut contents = String::new();
    part.read_to_string(&mut contents).unwrap();
    contents
}
