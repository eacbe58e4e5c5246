use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ExtractError;
use crate::export::ExportFormat;
use crate::ingest;
use crate::patterns::ExtractionType;
use crate::session::Session;

/// JSON-RPC front end over a single extraction session.
#[derive(Clone)]
pub struct McpServer {
    session: Arc<Mutex<Session>>,
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl McpServer {
    pub fn new(config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(config))),
        }
    }

    pub async fn handle_request(&self, request: Value) -> Result<Value, String> {
        let method = request["method"].as_str().unwrap_or("");
        debug!(method = method, "request received");

        match method {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(request["params"].clone()),
            _ => Err(format!("Unknown method: {}", method))
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, String> {
        self.session.lock().map_err(|_| "session lock poisoned".to_string())
    }

    fn handle_initialize(&self) -> Result<Value, String> {
        Ok(json!({
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "text-extractor",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }
        }))
    }

    fn handle_tools_list(&self) -> Result<Value, String> {
        Ok(json!({
            "result": {
                "tools": [
                    {
                        "name": "extract",
                        "description": "Extract emails, URLs, phone numbers, dates, numbers and an optional custom pattern from text",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "text": {
                                    "type": "string",
                                    "description": "Text content to extract from"
                                },
                                "types": {
                                    "type": "string",
                                    "description": "Types to extract (comma-separated, default: all)"
                                },
                                "custom_pattern": {
                                    "type": "string",
                                    "description": "Case-insensitive regular expression for the custom type"
                                }
                            },
                            "required": ["text"]
                        }
                    },
                    {
                        "name": "extract_file",
                        "description": "Extract everything from one or more plain-text files",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "file_path": {
                                    "type": "string",
                                    "description": "Paths to the files (comma-separated)"
                                },
                                "custom_pattern": {
                                    "type": "string",
                                    "description": "Case-insensitive regular expression for the custom type"
                                }
                            },
                            "required": ["file_path"]
                        }
                    },
                    {
                        "name": "extract_text",
                        "description": "Capture the complete text and report its size",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "text": { "type": "string", "description": "Text content" }
                            },
                            "required": ["text"]
                        }
                    },
                    {
                        "name": "export",
                        "description": "Export the session results as csv, txt or json",
                        "inputSchema": {
                            "type": "object",
                            "properties": {
                                "format": { "type": "string", "enum": ["csv", "txt", "json"] }
                            },
                            "required": ["format"]
                        }
                    },
                    {
                        "name": "copy_all",
                        "description": "Plain summary of every non-empty result",
                        "inputSchema": { "type": "object", "properties": {} }
                    },
                    {
                        "name": "analytics",
                        "description": "Result counts per extraction type",
                        "inputSchema": { "type": "object", "properties": {} }
                    },
                    {
                        "name": "clear",
                        "description": "Discard all results and the custom pattern",
                        "inputSchema": { "type": "object", "properties": {} }
                    }
                ]
            }
        }))
    }

    fn handle_tool_call(&self, params: Value) -> Result<Value, String> {
        let tool_name = params["name"].as_str()
            .ok_or("Missing tool name")?;

        let arguments = &params["arguments"];

        match tool_name {
            "extract" => self.extract(arguments),
            "extract_file" => self.extract_file(arguments),
            "extract_text" => self.extract_text(arguments),
            "export" => self.export(arguments),
            "copy_all" => self.copy_all(),
            "analytics" => self.analytics(),
            "clear" => self.clear(),
            _ => Err(format!("Unknown tool: {}", tool_name))
        }
    }

    fn extract(&self, args: &Value) -> Result<Value, String> {
        let text = args["text"].as_str()
            .ok_or("text is required")?;
        let custom_pattern = args["custom_pattern"].as_str();

        let types = match args["types"].as_str() {
            Some(list) => match crate::parse_types(list) {
                Ok(types) => types,
                Err(err) => return Ok(tool_failure(&err)),
            },
            None => ExtractionType::ALL.to_vec(),
        };

        let mut session = self.session()?;
        let batch = session.extract_types(&types, text, custom_pattern);
        Ok(batch_response(&batch.results, &batch.failures))
    }

    fn extract_file(&self, args: &Value) -> Result<Value, String> {
        let paths: Vec<&str> = args["file_path"].as_str()
            .ok_or("file_path is required")?
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let custom_pattern = args["custom_pattern"].as_str();

        let mut session = self.session()?;
        let ingested = ingest::read_sources(&paths, session.config().max_file_bytes);
        let batch = session.extract_all(&ingested.text, custom_pattern);

        let mut response = batch_response(&batch.results, &batch.failures);
        response["result"]["_meta"]["skipped"] = ingested
            .skipped
            .iter()
            .map(|(path, reason)| json!({ "path": path.display().to_string(), "reason": reason }))
            .collect();
        Ok(response)
    }

    fn extract_text(&self, args: &Value) -> Result<Value, String> {
        let text = args["text"].as_str()
            .ok_or("text is required")?;

        let mut session = self.session()?;
        match session.extract_full_text(text) {
            Ok(stats) => Ok(json!({
                "result": {
                    "content": [{
                        "type": "text",
                        "text": format!("Complete text extracted: {} chars, {} words, {} lines",
                            stats.chars, stats.words, stats.lines)
                    }],
                    "_meta": stats
                }
            })),
            Err(err) => Ok(tool_failure(&err)),
        }
    }

    fn export(&self, args: &Value) -> Result<Value, String> {
        let format = args["format"].as_str()
            .ok_or("format is required")?;

        let format: ExportFormat = match format.parse() {
            Ok(format) => format,
            Err(err) => return Ok(tool_failure(&err)),
        };

        let session = self.session()?;
        match session.export(format) {
            Ok(artifact) => {
                info!(filename = %artifact.filename, "exported over MCP");
                Ok(json!({
                    "result": {
                        "content": [{
                            "type": "text",
                            "text": artifact.content
                        }],
                        "_meta": {
                            "filename": artifact.filename,
                            "mimeType": artifact.mime
                        }
                    }
                }))
            }
            Err(err) => Ok(tool_failure(&err)),
        }
    }

    fn copy_all(&self) -> Result<Value, String> {
        let session = self.session()?;
        match session.copy_all() {
            Ok(summary) => Ok(text_result(summary)),
            Err(err) => Ok(tool_failure(&err)),
        }
    }

    fn analytics(&self) -> Result<Value, String> {
        let session = self.session()?;
        let counts = session.counts();

        let mut analysis_text = String::from("Extracted Items:\n");
        for (label, count) in &counts.0 {
            analysis_text.push_str(&format!("- {}: {}\n", label, count));
        }

        let data: serde_json::Map<String, Value> = counts
            .0
            .iter()
            .map(|(label, count)| (label.to_string(), json!(count)))
            .collect();

        Ok(json!({
            "result": {
                "content": [{
                    "type": "text",
                    "text": analysis_text
                }],
                "_meta": {
                    "counts": data,
                    "text": session.stats()
                }
            }
        }))
    }

    fn clear(&self) -> Result<Value, String> {
        self.session()?.clear();
        Ok(text_result("All content cleared".to_string()))
    }
}

fn text_result(text: String) -> Value {
    json!({
        "result": {
            "content": [{
                "type": "text",
                "text": text
            }]
        }
    })
}

/// A failed tool call the client should show as a notification, not a protocol error.
fn tool_failure(err: &ExtractError) -> Value {
    json!({
        "result": {
            "content": [{
                "type": "text",
                "text": err.to_string()
            }],
            "isError": true,
            "_meta": { "severity": err.severity().as_str() }
        }
    })
}

fn batch_response(
    results: &[(ExtractionType, crate::extractor::MatchSet)],
    failures: &[(ExtractionType, ExtractError)],
) -> Value {
    let mut summary = String::new();
    for (kind, matches) in results {
        if matches.is_empty() {
            summary.push_str(&format!("{}: No results found\n", kind));
        } else {
            summary.push_str(&format!("{} ({}): {}\n", kind, matches.len(), matches.as_slice().join(", ")));
        }
    }
    for (kind, err) in failures {
        summary.push_str(&format!("{} [{}]: {}\n", kind, err.severity().as_str(), err));
    }

    let data: serde_json::Map<String, Value> = results
        .iter()
        .map(|(kind, matches)| (kind.to_string(), json!(matches)))
        .collect();
    let errors: Vec<Value> = failures
        .iter()
        .map(|(kind, err)| json!({
            "type": kind.as_str(),
            "severity": err.severity().as_str(),
            "message": err.to_string()
        }))
        .collect();

    json!({
        "result": {
            "content": [{
                "type": "text",
                "text": summary
            }],
            "isError": results.is_empty() && !failures.is_empty(),
            "_meta": {
                "results": data,
                "failures": errors
            }
        }
    })
}
