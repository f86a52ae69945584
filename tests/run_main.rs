use std::time::Duration;

use assert_cmd::Command;

// Headless runs may fall back to a software adapter, which needs a while to
// compile the pipelines.
const TIMEOUT_DURATION: Duration = Duration::from_secs(30);

#[test]
fn main_doesnt_panic() -> Result<(), anyhow::Error> {
    Command::cargo_bin(env!("CARGO_PKG_NAME"))?
        .env("HEADLESS", "true")
        .timeout(TIMEOUT_DURATION)
        .assert()
        .success();
    Ok(())
}
