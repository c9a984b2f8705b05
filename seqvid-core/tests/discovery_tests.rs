// seqvid-core/tests/discovery_tests.rs

use seqvid_core::discovery::find_image_files;
use seqvid_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_image_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("shot_2.png"))?;
    File::create(input_dir.join("shot_1.PNG"))?; // Extension match is case-insensitive
    File::create(input_dir.join("plate_1.exr"))?;
    File::create(input_dir.join("scan_1.tiff"))?;
    File::create(input_dir.join("ref_1.jpeg"))?;
    File::create(input_dir.join("notes.txt"))?;
    File::create(input_dir.join("scan_2.tif"))?; // Only "tiff" is accepted
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested_1.png"))?; // Not searched

    let files = find_image_files(input_dir)?;
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec!["plate_1.exr", "ref_1.jpeg", "scan_1.tiff", "shot_1.PNG", "shot_2.png"]
    );
    assert!(files.iter().all(|f| f.starts_with(input_dir)));

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_image_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("document.txt"))?;
    fs::create_dir(dir.path().join("frames.png"))?; // A directory, whatever its name

    match find_image_files(dir.path()) {
        Err(CoreError::EmptySequence(path)) => assert_eq!(path, dir.path()),
        other => panic!("Unexpected result: {:?}", other),
    }

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_image_files_nonexistent_dir() {
    let missing = PathBuf::from("surely_this_does_not_exist_42_integration");
    match find_image_files(&missing) {
        Err(CoreError::DirectoryNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_find_image_files_on_a_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("shot_1.png");
    File::create(&file)?;

    assert!(matches!(find_image_files(&file), Err(CoreError::DirectoryNotFound(_))));
    Ok(())
}
