#[tokio::main]
async fn main() -> anyhow::Result<()> {
    formfield_menu_lib::run().await
}
