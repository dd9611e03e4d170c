use convoy::config::Config;
use convoy::engine::Engine;
use convoy::server::serve;
use convoy::store::MemoryStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().unwrap();
    let engine = Engine::new(MemoryStore::new(), &config);

    serve(engine, config.bind_addr).await;
}
