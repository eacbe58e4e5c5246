use clap::Parser;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use warp::{Filter, Reply};
use text_extractor::mcp_server::McpServer;
use text_extractor::{init_logging, Config};

/// MCP server over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

async fn handle_mcp_request(
    request: Value,
    server: McpServer,
) -> Result<impl Reply, Infallible> {
    let id = request["id"].clone();

    match server.handle_request(request).await {
        Ok(mut response) => {
            // JSON-RPC 2.0 envelope
            if let Some(obj) = response.as_object_mut() {
                obj.insert("jsonrpc".to_string(), json!("2.0"));
                if !id.is_null() {
                    obj.insert("id".to_string(), id);
                }
            }
            Ok(warp::reply::json(&response))
        },
        Err(err) => {
            let error_response = json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": -1,
                    "message": err
                }
            });
            Ok(warp::reply::json(&error_response))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    let args = Args::parse();

    let server = McpServer::new(Config::load_or_default(args.config.as_deref())?);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["POST", "OPTIONS"]);

    let mcp_route = warp::path("mcp")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |request: Value| {
            let server = server.clone();
            async move {
                handle_mcp_request(request, server).await
            }
        });

    let health_route = warp::path("health")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&json!({
                "status": "ok",
                "service": "text-extractor-mcp"
            }))
        });

    let routes = mcp_route
        .or(health_route)
        .with(cors);

    info!(addr = %args.listen, "MCP HTTP server starting");
    info!("health check: http://{}/health, MCP endpoint: http://{}/mcp", args.listen, args.listen);

    warp::serve(routes)
        .run(args.listen)
        .await;

    Ok(())
}
