use clap::Parser;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use text_extractor::mcp_server::McpServer;
use text_extractor::{init_logging, Config};

/// MCP server speaking line-delimited JSON-RPC over stdio
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let server = McpServer::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(request) => {
                let id = request["id"].clone();

                match server.handle_request(request).await {
                    Ok(mut resp) => {
                        // Echo the request id back when there is one
                        if !id.is_null() {
                            if let Some(obj) = resp.as_object_mut() {
                                obj.insert("id".to_string(), id);
                            }
                        }
                        resp
                    },
                    Err(err) => {
                        json!({
                            "id": id,
                            "error": {
                                "code": -1,
                                "message": err
                            }
                        })
                    }
                }
            }
            Err(_) => {
                json!({
                    "error": {
                        "code": -32700,
                        "message": "Parse error"
                    }
                })
            }
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    Ok(())
}
