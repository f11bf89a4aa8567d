//! `rose status`: one non-repeating refresh.

use rose_api::RoseClient;
use rose_core::{Poller, StatusFields};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    poller: &Poller<RoseClient, StatusFields>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    poller.refresh(false).await.outcome?;
    print_fields(poller.view(), global);
    Ok(())
}

/// Print the fields as the last render left them.
pub fn print_fields(fields: &StatusFields, global: &GlobalOpts) {
    let out = output::render_status(
        global.output(),
        &fields.current(),
        output::should_color(global.color()),
    );
    output::print_output(&out, global.quiet);
}
