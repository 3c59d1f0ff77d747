use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use crate::api::dto::{AnalysisResponse, ValidationResponse};
use crate::application::AnalyzeUsecase;
use crate::infrastructure::RustPythonParser;

#[derive(Debug, Deserialize)]
struct CommandReq {
    command: String,
    params: Option<serde_json::Value>,
}

/// What the connection loop should do after answering a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Shutdown,
}

/// Serve line-delimited JSON requests until a `SHUTDOWN` arrives.
pub fn start_server(port: u16) -> Result<()> {
    let address = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind to {}", address))?;

    tracing::info!("pysift server listening on {}", address);
    serve(listener)
}

fn serve(listener: TcpListener) -> Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                thread::spawn(move || match handle_connection(stream) {
                    Ok(Flow::Shutdown) => {
                        tracing::info!("shutdown requested");
                        std::process::exit(0);
                    }
                    Ok(Flow::Continue) => {}
                    Err(e) => tracing::error!("connection error: {:#}", e),
                });
            }
            Err(e) => tracing::warn!("accept error: {}", e),
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream) -> Result<Flow> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            return Ok(Flow::Continue); // Connection closed
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (response, flow) = respond(trimmed);
        let response_str = serde_json::to_string(&response)?;
        stream.write_all(response_str.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;

        if flow == Flow::Shutdown {
            return Ok(Flow::Shutdown);
        }
    }
}

/// Turn one request line into its response envelope.
fn respond(request: &str) -> (serde_json::Value, Flow) {
    match process_command(request) {
        Ok((data, flow)) => (json!({ "status": "success", "data": data }), flow),
        Err(e) => (json!({ "status": "error", "message": format!("{:#}", e) }), Flow::Continue),
    }
}

fn process_command(json_str: &str) -> Result<(serde_json::Value, Flow)> {
    let req: CommandReq = serde_json::from_str(json_str)
        .context("Invalid JSON format")?;
    tracing::debug!(command = %req.command, "request");

    let usecase = AnalyzeUsecase::new(&RustPythonParser);
    match req.command.as_str() {
        "PING" => Ok((json!("PONG"), Flow::Continue)),
        "ANALYZE" => {
            let source = source_param(req.params.as_ref())?;
            let response = AnalysisResponse::from(usecase.analyze(source));
            Ok((serde_json::to_value(response)?, Flow::Continue))
        }
        "VALIDATE" => {
            let source = source_param(req.params.as_ref())?;
            let response = ValidationResponse::from(usecase.validate(source));
            Ok((serde_json::to_value(response)?, Flow::Continue))
        }
        "SHUTDOWN" => Ok((json!("Shutting down..."), Flow::Shutdown)),
        _ => anyhow::bail!("Unknown command: {}", req.command),
    }
}

fn source_param(params: Option<&serde_json::Value>) -> Result<&str> {
    params
        .ok_or_else(|| anyhow::anyhow!("Missing params"))?
        .get("source")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing 'source' param"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let (response, flow) = respond(r#"{"command": "PING"}"#);
        assert_eq!(response, json!({"status": "success", "data": "PONG"}));
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn test_analyze_command() {
        let (response, _) =
            respond(r#"{"command": "ANALYZE", "params": {"source": "def f(a):\n    pass\n"}}"#);
        assert_eq!(response["status"], "success");
        assert_eq!(response["data"]["success"], true);
        assert_eq!(response["data"]["ast"]["functions"][0]["name"], "f");
    }

    #[test]
    fn test_validate_command_reports_error() {
        let (response, _) =
            respond(r#"{"command": "VALIDATE", "params": {"source": "def f(:\n    pass\n"}}"#);
        assert_eq!(response["data"]["valid"], false);
        assert_eq!(response["data"]["error"]["line"], 1);
    }

    #[test]
    fn test_bad_requests() {
        let (response, _) = respond("not json");
        assert_eq!(response["status"], "error");
        let (response, _) = respond(r#"{"command": "ANALYZE"}"#);
        assert_eq!(response["message"], "Missing params");
        let (response, _) = respond(r#"{"command": "FROB"}"#);
        assert_eq!(response["message"], "Unknown command: FROB");
    }

    #[test]
    fn test_shutdown_stops_connection() {
        let (_, flow) = respond(r#"{"command": "SHUTDOWN"}"#);
        assert_eq!(flow, Flow::Shutdown);
    }

    #[test]
    fn test_round_trip_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream).unwrap()
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"{\"command\": \"PING\"}\n").unwrap();
        client.write_all(b"{\"command\": \"SHUTDOWN\"}\n").unwrap();
        let mut lines = BufReader::new(client.try_clone().unwrap()).lines();
        let first: serde_json::Value = serde_json::from_str(&lines.next().unwrap().unwrap()).unwrap();
        assert_eq!(first["data"], "PONG");
        let second: serde_json::Value = serde_json::from_str(&lines.next().unwrap().unwrap()).unwrap();
        assert_eq!(second["data"], "Shutting down...");
        assert_eq!(server.join().unwrap(), Flow::Shutdown);
    }
}
