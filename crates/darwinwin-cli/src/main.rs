mod command;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    util::init_tracing();
    command::run()
}
