use std::io::Write;
use std::sync::Arc;

use crate::app::{AppContext, CaptionFeedError, Result};
use crate::render::{page_entries, render_page, republish};
use crate::web;

pub async fn serve(ctx: AppContext, bind: Option<String>) -> Result<()> {
    let addr = match bind {
        Some(b) => b
            .parse()
            .map_err(|_| CaptionFeedError::Config(format!("not a socket address: {}", b)))?,
        None => ctx.config.server.bind_addr()?,
    };

    web::serve(Arc::new(ctx), addr).await
}

pub async fn print_feed(ctx: &AppContext) -> Result<()> {
    let feed = ctx.feeds.get_feed().await?;
    let body = republish(&feed)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

pub async fn print_page(ctx: &AppContext) -> Result<()> {
    let feed = ctx.feeds.get_feed().await?;
    print!("{}", render_page(&page_entries(&feed)));
    Ok(())
}
