#![no_main]
use std::rc::Rc;

use antichess::chess::position::Position;
use antichess::chess::zobrist::ZobristKeys;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let keys = Rc::new(ZobristKeys::seeded(0));
    let Ok(position) = Position::from_notation(input, Rc::clone(&keys)) else {
        return;
    };
    // Printing a parsed position and parsing it back is lossless.
    let printed = position.to_string();
    let reparsed = Position::from_notation(&printed, keys)
        .expect("printed positions should be accepted");
    assert_eq!(reparsed.to_string(), printed);
    assert_eq!(reparsed.hash(), position.hash());
    let _ = position.generate_moves();
});
