use assert_cmd::Command;

pub fn coachbot_bin() -> Command {
    #[allow(deprecated)]
    {
        Command::cargo_bin("coachbot").expect("coachbot test binary should build")
    }
}
