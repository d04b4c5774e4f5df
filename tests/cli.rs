mod common;

use common::coachbot_bin;

#[test]
fn version_flag_prints_name_and_version() {
    coachbot_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("coachbot"));
}

#[test]
fn help_flag_lists_usage() {
    coachbot_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("USAGE"));
}

#[test]
fn missing_config_is_a_startup_error() {
    coachbot_bin()
        .arg("/nonexistent/config.toml")
        .assert()
        .failure();
}
