//! Unit tests for inertia calibration files.

use std::io::Write;

use ashdome::config::Steps;
use ashdome::motion::InertiaTable;
use ashdome::protocol::Command;
use ashdome::{Degrees, Dome, Progress};
use embedded_hal_mock::eh1::delay::NoopDelay;

use crate::common::{test_config, tick_until, BoardState, MockBoard};

fn write_table(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

/// Test that a calibration file with a byte-order mark and Windows line
/// endings loads.
#[test]
fn test_load_table_with_bom() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all("\u{feff}0;0\r\n1 ;40\r\n2;90\r\n".as_bytes()).unwrap();

    let table = InertiaTable::load(file.path()).unwrap();
    assert_eq!(table.entries(), &[0, 40, 90]);
}

/// Test that out-of-sequence lines are skipped.
#[test]
fn test_out_of_sequence_lines_skipped() {
    let file = write_table(&["0;0", "5;500", "1;10"]);
    let table = InertiaTable::load(file.path()).unwrap();
    // line 1 carries index 5 and is dropped; line 2 carries index 1
    assert_eq!(table.entries(), &[0]);
}

/// Test that a missing calibration file disables compensation.
#[test]
fn test_missing_table_is_identity() {
    let dir = tempfile::tempdir().unwrap();
    let table = InertiaTable::load(dir.path().join("absent.txt")).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.compensate(Steps(321)), Steps(321));
}

/// Test that the builder loads the configured table and moves use it.
#[test]
fn test_configured_table_shortens_moves() {
    let lines: Vec<String> = (0..2048u32).map(|i| format!("{i};{}", i * 2)).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write_table(&refs);

    let mut config = test_config();
    config.dome.inertia_table = Some(file.path().to_path_buf());

    let mut dome = Dome::builder().config(config).delay(NoopDelay::new()).build().unwrap();
    assert_eq!(dome.inertia().len(), 2048);

    let (transport, board) = MockBoard::new(BoardState {
        coast: (0..2048u32).map(|i| i * 2).collect(),
        ..BoardState::default()
    });
    dome.connect(Box::new(transport)).unwrap();

    assert_eq!(dome.move_abs(Degrees(90.0)), Ok(Progress::Busy));
    assert_eq!(
        board.borrow().payloads_of(Command::CwRotation),
        vec![512u16.to_le_bytes().to_vec()]
    );
    assert!(tick_until(&mut dome, 5, |d| d.state() == ashdome::DomeState::Ready));
}
