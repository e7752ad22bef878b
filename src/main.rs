use gigatribe_chat_export::cli;
use gigatribe_chat_export::utils::logging;

fn main() -> anyhow::Result<()> {
    if let Err(e) = logging::init() {
        eprintln!("warning: {}", e);
    }
    cli::run()
}
