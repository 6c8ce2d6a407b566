//! Static file server: plain HTTP/1.1, a short-lived thread per connection, `Connection: close`.
//!
//! The root directory is handed to the request handler explicitly; the process working
//! directory is never read or changed.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use distframe_core::html;

use crate::error::ServeError;
use crate::mime::{guess_mime, url_decode};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_HEADER_LINES: usize = 100;

/// A running static server. Stopped by [`StaticServer::shutdown`] or on drop.
pub struct StaticServer {
    addr: SocketAddr,
    root: PathBuf,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Bind `host:port` and serve `root` on a background thread.
    ///
    /// Binding happens before this returns, so a port conflict is reported to the caller
    /// as [`ServeError::PortConflict`]. Port 0 binds an ephemeral port.
    pub fn start(root: &Path, host: &str, port: u16, index_file: &str) -> Result<Self, ServeError> {
        if !root.is_dir() {
            return Err(ServeError::BuildDirectoryMissing {
                dir: root.to_path_buf(),
            });
        }
        let root = root
            .canonicalize()
            .map_err(|_| ServeError::BuildDirectoryMissing {
                dir: root.to_path_buf(),
            })?;

        let listener =
            TcpListener::bind((host, port)).map_err(|e| ServeError::from_bind(e, port))?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServeError::ServerStartFailed { port, source })?;

        let stop = Arc::new(AtomicBool::new(false));
        let site = Arc::new(Site {
            root: root.clone(),
            index_file: index_file.to_string(),
        });
        let stop_flag = stop.clone();
        let worker = std::thread::Builder::new()
            .name("distframe-static".to_string())
            .spawn(move || {
                for stream in listener.incoming() {
                    if stop_flag.load(Ordering::SeqCst) {
                        break;
                    }
                    match stream {
                        Ok(s) => site.dispatch(s),
                        Err(e) => tracing::debug!(error = %e, "accept failed"),
                    }
                }
            })
            .map_err(|source| ServeError::ServerStartFailed {
                port: addr.port(),
                source,
            })?;

        tracing::info!(root = %root.display(), addr = %addr, "Static server started");
        Ok(Self {
            addr,
            root,
            stop,
            worker: Some(worker),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loopback URL of the site root. A wildcard bind is reached through loopback.
    pub fn local_url(&self) -> String {
        format!("http://{}/", self.loopback_addr())
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop accepting, wait for the worker to exit and release the port. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.stop.store(true, Ordering::SeqCst);
        // Unblock accept().
        let _ = TcpStream::connect_timeout(&self.loopback_addr(), WAKE_TIMEOUT);
        if worker.join().is_err() {
            tracing::warn!(addr = %self.addr, "Static server thread panicked");
            return;
        }
        tracing::info!(addr = %self.addr, "Static server stopped");
    }

    fn loopback_addr(&self) -> SocketAddr {
        let ip = match self.addr.ip() {
            IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        SocketAddr::new(ip, self.addr.port())
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ─── Request handling ───────────────────────────────────────────────────────

struct Site {
    root: PathBuf,
    index_file: String,
}

struct Request {
    method: String,
    target: String,
}

impl Site {
    /// One thread per connection; an idle socket only stalls itself.
    fn dispatch(self: &Arc<Self>, stream: TcpStream) {
        let site = Arc::clone(self);
        let spawned = std::thread::Builder::new()
            .name("distframe-conn".to_string())
            .spawn(move || site.handle(stream));
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "Failed to spawn connection thread");
        }
    }

    fn handle(&self, mut stream: TcpStream) {
        let _ = stream.set_read_timeout(Some(READ_TIMEOUT));
        let Some(request) = read_request(&stream) else {
            return;
        };
        let response = self.respond(&request);
        tracing::debug!(method = %request.method, target = %request.target, status = response.status, "served");
        let _ = response.write_to(&mut stream, request.method == "HEAD");
        let _ = stream.flush();
    }

    fn respond(&self, req: &Request) -> Response {
        if req.method != "GET" && req.method != "HEAD" {
            return Response::text("405 Method Not Allowed").with_header("Allow", "GET, HEAD");
        }

        let raw_path = req.target.split(['?', '#']).next().unwrap_or("/");
        let decoded = url_decode(raw_path);
        let rel = Path::new(decoded.trim_start_matches('/'));
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Response::text("403 Forbidden");
        }

        let candidate = self.root.join(rel);
        if candidate.is_dir() {
            if !raw_path.ends_with('/') {
                return Response::text("301 Moved Permanently")
                    .with_header("Location", &format!("{}/", raw_path));
            }
            let index = candidate.join(&self.index_file);
            if index.is_file() {
                return self.serve_file(&index);
            }
            return self.listing(&candidate, &decoded);
        }
        if candidate.is_file() {
            return self.serve_file(&candidate);
        }
        Response::text("404 Not Found")
    }

    fn serve_file(&self, path: &Path) -> Response {
        // Symlinks may point outside the root.
        let real = match path.canonicalize() {
            Ok(real) if real.starts_with(&self.root) => real,
            Ok(_) => return Response::text("403 Forbidden"),
            Err(_) => return Response::text("404 Not Found"),
        };
        match std::fs::read(&real) {
            Ok(body) => Response::new("200 OK", guess_mime(&real), body),
            Err(e) => {
                tracing::warn!(path = %real.display(), error = %e, "Failed to read file");
                Response::text("500 Internal Server Error")
            }
        }
    }

    fn listing(&self, dir: &Path, request_path: &str) -> Response {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|entry| {
                        let name = entry.file_name().to_str()?.to_string();
                        if name.starts_with('.') {
                            return None;
                        }
                        Some(if entry.path().is_dir() {
                            format!("{}/", name)
                        } else {
                            name
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        names.sort();

        let title = html::escape(&format!("Directory listing for {}", request_path));
        let items: String = names
            .iter()
            .map(|n| format!("<li><a href=\"{0}\">{0}</a></li>", html::escape(n)))
            .collect();
        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{0}</title></head>\
             <body><h1>{0}</h1><ul>{1}</ul></body></html>",
            title, items
        );
        Response::new("200 OK", "text/html; charset=utf-8", body.into_bytes())
    }
}

fn read_request(stream: &TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    if reader.read_line(&mut line).ok()? == 0 {
        return None;
    }
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    // Drain headers; closing with unread input resets the connection.
    for _ in 0..MAX_HEADER_LINES {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header.trim().is_empty() => break,
            Ok(_) => {}
        }
    }
    Some(Request { method, target })
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl Response {
    fn new(status: &'static str, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            headers: Vec::new(),
            body,
        }
    }

    fn text(status: &'static str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", status.as_bytes().to_vec())
    }

    fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn write_to(&self, w: &mut impl Write, head_only: bool) -> io::Result<()> {
        let mut head = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Cache-Control: no-store, no-cache, must-revalidate, max-age=0\r\n\
             Connection: close\r\n",
            self.status,
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");
        w.write_all(head.as_bytes())?;
        if !head_only {
            w.write_all(&self.body)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn site_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "<h1>app</h1>").unwrap();
        std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
        std::fs::write(tmp.path().join("assets/app.js"), "console.log(1)").unwrap();
        std::fs::create_dir_all(tmp.path().join("docs")).unwrap();
        std::fs::write(tmp.path().join("docs/readme.txt"), "hi").unwrap();
        tmp
    }

    fn start(dir: &Path) -> StaticServer {
        StaticServer::start(dir, "127.0.0.1", 0, "index.html").unwrap()
    }

    /// Raw HTTP exchange; returns (status line, full response text).
    fn request(addr: SocketAddr, method: &str, target: &str) -> (String, String) {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "{} {} HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test\r\n\r\n", method, target)
            .unwrap();
        let mut text = String::new();
        stream.read_to_string(&mut text).unwrap();
        let status = text.lines().next().unwrap_or_default().to_string();
        (status, text)
    }

    #[test]
    fn test_idle_connection_does_not_block_others() {
        let dir = site_dir();
        let server = start(dir.path());

        let _idle = TcpStream::connect(server.addr()).unwrap();
        let started = std::time::Instant::now();
        let (status, _) = request(server.addr(), "GET", "/");
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(started.elapsed() < READ_TIMEOUT / 2);
    }

    #[test]
    fn test_serves_index_and_assets() {
        let dir = site_dir();
        let server = start(dir.path());

        let (status, text) = request(server.addr(), "GET", "/");
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(text.contains("Content-Type: text/html; charset=utf-8"));
        assert!(text.ends_with("<h1>app</h1>"));

        let (status, text) = request(server.addr(), "GET", "/assets/app.js?v=3");
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(text.contains("application/javascript"));
        assert!(text.ends_with("console.log(1)"));
    }

    #[test]
    fn test_not_found_and_method() {
        let dir = site_dir();
        let server = start(dir.path());

        let (status, _) = request(server.addr(), "GET", "/missing.css");
        assert_eq!(status, "HTTP/1.1 404 Not Found");

        let (status, text) = request(server.addr(), "POST", "/");
        assert_eq!(status, "HTTP/1.1 405 Method Not Allowed");
        assert!(text.contains("Allow: GET, HEAD"));
    }

    #[test]
    fn test_head_has_no_body() {
        let dir = site_dir();
        let server = start(dir.path());
        let (status, text) = request(server.addr(), "HEAD", "/index.html");
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(text.contains("Content-Length: 12"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_traversal_is_forbidden() {
        let parent = tempfile::tempdir().unwrap();
        std::fs::write(parent.path().join("secret.txt"), "secret").unwrap();
        let root = parent.path().join("dist");
        std::fs::create_dir_all(&root).unwrap();
        let server = start(&root);

        let (status, text) = request(server.addr(), "GET", "/../secret.txt");
        assert_eq!(status, "HTTP/1.1 403 Forbidden");
        assert!(!text.contains("secret\r"));

        let (status, _) = request(server.addr(), "GET", "/%2e%2e/secret.txt");
        assert_eq!(status, "HTTP/1.1 403 Forbidden");
    }

    #[test]
    fn test_directory_redirect_and_listing() {
        let dir = site_dir();
        let server = start(dir.path());

        let (status, text) = request(server.addr(), "GET", "/docs");
        assert_eq!(status, "HTTP/1.1 301 Moved Permanently");
        assert!(text.contains("Location: /docs/"));

        let (status, text) = request(server.addr(), "GET", "/docs/");
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(text.contains("Directory listing for /docs/"));
        assert!(text.contains("<a href=\"readme.txt\">readme.txt</a>"));
    }

    #[test]
    fn test_second_bind_is_port_conflict() {
        let dir = site_dir();
        let first = start(dir.path());
        let second = StaticServer::start(dir.path(), "127.0.0.1", first.port(), "index.html");
        match second {
            Err(ServeError::PortConflict { port }) => assert_eq!(port, first.port()),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("second bind on the same port succeeded"),
        }
        let (status, _) = request(first.addr(), "GET", "/");
        assert_eq!(status, "HTTP/1.1 200 OK");
    }

    #[test]
    fn test_shutdown_releases_port() {
        let dir = site_dir();
        let mut server = start(dir.path());
        let port = server.port();
        assert!(server.is_running());
        server.shutdown();
        assert!(!server.is_running());
        server.shutdown();
        TcpListener::bind(("127.0.0.1", port)).unwrap();
    }

    #[test]
    fn test_missing_root_does_not_bind() {
        let tmp = tempfile::tempdir().unwrap();
        let err = StaticServer::start(&tmp.path().join("dist"), "127.0.0.1", 0, "index.html")
            .err()
            .unwrap();
        assert!(matches!(err, ServeError::BuildDirectoryMissing { .. }));
    }

    #[test]
    fn test_wildcard_bind_uses_loopback_url() {
        let dir = site_dir();
        let server = StaticServer::start(dir.path(), "0.0.0.0", 0, "index.html").unwrap();
        assert_eq!(server.local_url(), format!("http://127.0.0.1:{}/", server.port()));
    }

    #[test]
    fn test_cwd_untouched() {
        let before = std::env::current_dir().unwrap();
        let dir = site_dir();
        let server = start(dir.path());
        let _ = request(server.addr(), "GET", "/");
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(server.root(), dir.path().canonicalize().unwrap());
    }
}
