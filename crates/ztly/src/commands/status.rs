//! Controller status handler.

use ztly_core::ControllerStatus;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

fn detail(status: &ControllerStatus, color: bool) -> String {
    let health = output::status_word(
        status.online,
        if status.online { "online" } else { "offline" },
        color,
    );
    [
        format!("Address:  {}", status.address),
        format!("Version:  {}", status.version),
        format!("Status:   {health}"),
    ]
    .join("\n")
}

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let status = ctx.service.status().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &status,
        |s| detail(s, color),
        |s| s.address.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
