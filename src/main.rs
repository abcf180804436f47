use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    insta_grab_lib::run().await
}
