use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "antichess";

fn engine() -> Command {
    Command::cargo_bin(BINARY_NAME).expect("Binary should be built")
}

#[test]
fn identification() {
    drop(
        engine()
            .write_stdin("id\nisready\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("id name antichess")
                    .and(contains("id author"))
                    .and(contains("idok"))
                    .and(contains("readyok")),
            ),
    );
}

#[test]
fn computer_replies_to_human_move() {
    drop(
        engine()
            .write_stdin("move e2e4\nquit\n")
            .assert()
            .success()
            .stdout(contains("bestmove ")),
    );
}

#[test]
fn computer_plays_white() {
    drop(
        engine()
            .args(["--computer", "white", "--difficulty", "2"])
            .write_stdin("quit\n")
            .assert()
            .success()
            .stdout(contains("bestmove ")),
    );
}

#[test]
fn legal_moves_and_forced_pieces() {
    drop(
        engine()
            .args(["--computer", "none"])
            .write_stdin(
                "moves\nposition rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w\nforced\nmoves\n",
            )
            .assert()
            .success()
            .stdout(
                contains("moves b1a3")
                    .and(contains(" e2e4 "))
                    .and(contains("forced e4"))
                    .and(contains("moves e4d5\n")),
            ),
    );
}

#[test]
fn bad_input_is_reported() {
    drop(
        engine()
            .args(["--computer", "none"])
            .write_stdin(
                "move e2e5\nmove z9z9\nsetoption name Difficulty value 11\nfly\nisready\n",
            )
            .assert()
            .success()
            .stdout(
                contains("info string illegal move e2e5")
                    .and(contains("info string unsupported command: fly"))
                    .and(contains("difficulty should be within 1..=10"))
                    .and(contains("readyok")),
            ),
    );
}

#[test]
fn game_end_is_reported() {
    drop(
        engine()
            .args(["--computer", "none"])
            .write_stdin("position 8/8/8/8/8/8/p7/1P6 w\nmove b1a2\nmove a2a3\nnewgame\nresign\n")
            .assert()
            .success()
            .stdout(
                contains("result 0-1 no pieces left")
                    .and(contains("info string the game is over"))
                    .and(contains("result 0-1 resignation")),
            ),
    );
}

#[test]
fn invalid_arguments() {
    drop(
        engine()
            .args(["--difficulty", "0"])
            .assert()
            .failure(),
    );
}
