use libtest_mimic::Arguments;
use libtest_mimic::Trial;
use progmon::error::Result;


mod cli;
mod percent;

pub use utils::*;

fn main() -> Result<()> {
    let args = Arguments::from_args();

    let client = TEST_RUNTIME.block_on(init_test_service())?;

    let mut tests = Vec::new();

    monitor::tests(&mut tests);
    percent::tests(&mut tests);
    shared::tests(&mut tests);
    transfer::tests(&client, &mut tests);
    cli::tests(&client, &mut tests);

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let conclusion = libtest_mimic::run(&args, tests);

    TEST_FIXTURE.cleanup();

    conclusion.exit()
}
