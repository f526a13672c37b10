#[tokio::main]
async fn main() -> anyhow::Result<()> {
    r2s_auth::app::run().await
}
