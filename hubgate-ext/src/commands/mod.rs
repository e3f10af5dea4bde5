pub mod authn;
pub mod authz;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};

pub async fn read_input<R>(mut input: R) -> anyhow::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read stdin")?;
    Ok(buffer)
}
