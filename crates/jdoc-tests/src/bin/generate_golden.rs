//! Golden fixture generator.
//!
//! Writes every fixture from [`jdoc_tests::fixtures`] to `tests/golden/`
//! as a `.bson` file, with a `.hex` dump next to it for review in diffs.
//! Other implementations can decode these files to check they agree with
//! this one.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p jdoc-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                          | Contents                                |
//! |-------------------------------|-----------------------------------------|
//! | empty.bson                    | `05 00 00 00 00`                        |
//! | single_int32.bson             | `{ "x": int32 42 }`                     |
//! | scalars.bson                  | one element of every scalar type        |
//! | nested.bson                   | document / array nesting                |
//! | five_ints.bson                | five-element array                      |
//! | concatenated.bson             | two documents back to back              |
//! | malformed/unknown_type.bson   | type code 0x13                          |
//! | malformed/short_prefix.bson   | length prefix below 5                   |
//! | malformed/long_prefix.bson    | prefix longer than the data             |
//! | malformed/truncated.bson      | cut off mid-element                     |
//! | malformed/unterminated_string.bson | string without its NUL             |

#![allow(clippy::pedantic)]

use std::fs;
use std::path::Path;

use jdoc_tests::fixtures::{self, Fixture};

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    write_all(&golden_dir, &fixtures::golden());
    write_all(&golden_dir.join("malformed"), &fixtures::malformed());

    println!("All golden fixtures written to {}", golden_dir.display());
}

fn write_all(dir: &Path, set: &[Fixture]) {
    fs::create_dir_all(dir).unwrap();
    for fixture in set {
        let path = dir.join(format!("{}.bson", fixture.name));
        fs::write(&path, &fixture.bytes).unwrap();
        fs::write(path.with_extension("hex"), hex_dump(&fixture.bytes)).unwrap();
        println!("  {} ({} bytes)", path.display(), fixture.bytes.len());
    }
}

/// 16 bytes per line, offset first.
fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| format!("{:08x}  {}\n", i * 16, hex::encode(chunk)))
        .collect()
}
