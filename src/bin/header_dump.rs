//! Dumps a PLY file's header: format, version, and every element's
//! properties.

use ply_stream::Reader;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: header-dump <path.ply>");
        return ExitCode::FAILURE;
    };

    let reader = Reader::open(&path);
    if !reader.valid() {
        eprintln!("{path}: not a readable PLY file");
        return ExitCode::FAILURE;
    }

    println!(
        "format: {:?} {}.{}",
        reader.file_type().unwrap(),
        reader.version_major().unwrap(),
        reader.version_minor().unwrap()
    );

    for i in 0..reader.num_elements() {
        let elem = reader.get_element(i).unwrap();
        println!("element {} ({} rows)", String::from_utf8_lossy(&elem.name), elem.count);
        for prop in &elem.properties {
            let name = String::from_utf8_lossy(&prop.name);
            if prop.is_list() {
                println!("  list {name}");
            } else {
                println!("  {name} (offset {})", prop.offset);
            }
        }
    }

    ExitCode::SUCCESS
}
