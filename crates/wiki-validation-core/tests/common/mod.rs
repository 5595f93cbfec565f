// crates/wiki-validation-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for wiki-validation-core tests.
// Purpose: Provide stub wiki servers, fixture archives, and capture writers.
// Dependencies: tempfile, tiny_http, wiki-validation-config, zip
// ============================================================================

//! ## Overview
//! Provides a recording `tiny_http` stub server, zip archive fixtures with a
//! `package.xml` table of contents, config builders, and writer doubles.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use tempfile::TempDir;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use wiki_validation_config::ValidationConfig;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// `Authorization` header value for the default `Admin`/`admin` credentials.
pub const ADMIN_AUTHORIZATION: &str = "Basic QWRtaW46YWRtaW4=";

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// Canned response served by [`StubServer`].
pub struct StubResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// Optional `Location` header.
    pub location: Option<String>,
}

impl StubResponse {
    /// Creates a 200 response with `body`.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            location: None,
        }
    }

    /// Creates an empty response with `status`.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            location: None,
        }
    }

    /// Creates a redirect to `location`.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            location: Some(location.to_string()),
        }
    }
}

/// Request observed by [`StubServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request path and query.
    pub url: String,
    /// `Authorization` header, if sent.
    pub authorization: Option<String>,
}

/// Local HTTP server answering a fixed sequence of requests.
pub struct StubServer {
    /// Base address, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// Server thread returning the recorded requests.
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl StubServer {
    /// Starts a server answering one request per canned response, in order.
    pub fn start(responses: Vec<StubResponse>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let base_url = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for stub in responses {
                let Ok(request) = server.recv() else {
                    break;
                };
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string());
                recorded.push(RecordedRequest {
                    url: request.url().to_string(),
                    authorization,
                });
                let mut response = Response::from_data(stub.body).with_status_code(stub.status);
                if let Some(location) = stub.location {
                    response = response
                        .with_header(Header::from_bytes("Location", location).unwrap());
                }
                let _ = request.respond(response);
            }
            recorded
        });
        Self {
            base_url,
            handle,
        }
    }

    /// Waits for the server thread and returns the recorded requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().expect("server thread")
    }
}

/// Answers one request with a hand-written status line, e.g. `HTTP/1.1 404 Gone`.
///
/// Returns the base address and the server thread.
pub fn serve_status_line(status_line: &str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("tcp listener");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read request") > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        reader.get_mut().write_all(response.as_bytes()).expect("write response");
    });
    (base_url, handle)
}

// ============================================================================
// SECTION: Archive Fixtures
// ============================================================================

/// Builds a `package.xml` table of contents listing `names`.
pub fn package_xml(names: &[&str]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<package>\n");
    xml.push_str("  <infos><name>Test Package</name></infos>\n  <files>\n");
    for name in names {
        xml.push_str(&format!("    <file defaultAction=\"0\" language=\"\">{name}</file>\n"));
    }
    xml.push_str("  </files>\n</package>\n");
    xml
}

/// Writes a zip archive with the given entries into a fresh temp dir.
pub fn write_archive(entries: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("wiki.xar");
    write_archive_at(&path, entries);
    (dir, path)
}

/// Writes a zip archive with the given entries at `path`.
pub fn write_archive_at(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create archive");
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

/// Writes an archive whose table of contents lists `names`.
pub fn write_package(names: &[&str]) -> (TempDir, PathBuf) {
    let toc = package_xml(names);
    write_archive(&[("package.xml", toc.as_str()), ("Main/WebHome.xml", "<xwikidoc/>")])
}

// ============================================================================
// SECTION: Config Helpers
// ============================================================================

/// Builds a validated config against `base_url`.
pub fn config_for(
    base_url: &str,
    admin_urls: &str,
    guest_urls: &str,
    archive_path: &Path,
    documents_pattern: Option<&str>,
) -> ValidationConfig {
    let pattern = documents_pattern
        .map(|pattern| format!("documents_pattern = '{pattern}'\n"))
        .unwrap_or_default();
    let toml = format!(
        "[server]\nbase_url = \"{base_url}\"\n\n[http]\ntimeout_ms = 5000\n\n[targets]\nadmin_urls \
         = \"{admin_urls}\"\nguest_urls = \"{guest_urls}\"\narchive_path = '{}'\n{pattern}",
        archive_path.display()
    );
    ValidationConfig::from_toml_str(&toml).expect("valid config")
}

// ============================================================================
// SECTION: Shared Buffer for Write Testing
// ============================================================================

/// A thread-safe buffer for testing Write implementations.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates a new empty shared buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents as a string.
    pub fn to_string_lossy(&self) -> String {
        let guard = self.inner.lock().expect("buffer lock");
        String::from_utf8_lossy(&guard).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Failing Writer for Error Testing
// ============================================================================

/// A writer that always fails, for testing error paths.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("simulated write failure"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
