//! `sqltrail classify` - print the statement type of each argument.

use sqltrail_core::classify;

pub fn run(statements: &[String]) -> anyhow::Result<()> {
    for sql in statements {
        println!("{}\t{}", classify(sql), sql);
    }
    Ok(())
}
