//! Shared inputs for the seekserve benchmarks.

/// A named benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    content: &'static str,
}

impl TestCase {
    pub const fn new(name: &'static str, content: &'static str) -> Self {
        Self { name, content }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn content(&self) -> &'static str {
        self.content
    }
}

pub const SMALL_REQUEST: TestCase = TestCase::new("small_request", "GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");

pub const MEDIA_REQUEST: TestCase = TestCase::new(
    "media_request",
    concat!(
        "GET /movies/Some%20Film%20(2019)/film.mp4 HTTP/1.1\r\n",
        "Host: 192.168.1.20:8080\r\n",
        "User-Agent: VLC/3.0.20 LibVLC/3.0.20\r\n",
        "Accept: */*\r\n",
        "Accept-Language: en_US\r\n",
        "Icy-MetaData: 1\r\n",
        "Range: bytes=1048576-\r\n",
        "Connection: close\r\n",
        "\r\n",
    ),
);

pub const BROWSER_REQUEST: TestCase = TestCase::new(
    "browser_request",
    concat!(
        "GET /docs/?lang=en HTTP/1.1\r\n",
        "Host: localhost:8080\r\n",
        "User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0\r\n",
        "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n",
        "Accept-Language: en-US,en;q=0.5\r\n",
        "Accept-Encoding: gzip, deflate, br, zstd\r\n",
        "Connection: keep-alive\r\n",
        "Cookie: theme=dark; session=4f9c2d1e8b7a6f5e4d3c2b1a0f9e8d7c\r\n",
        "Upgrade-Insecure-Requests: 1\r\n",
        "Sec-Fetch-Dest: document\r\n",
        "Sec-Fetch-Mode: navigate\r\n",
        "Sec-Fetch-Site: none\r\n",
        "Sec-Fetch-User: ?1\r\n",
        "Priority: u=0, i\r\n",
        "\r\n",
    ),
);

pub const REQUESTS: [TestCase; 3] = [SMALL_REQUEST, MEDIA_REQUEST, BROWSER_REQUEST];

pub const RANGES: [TestCase; 4] = [
    TestCase::new("open_ended", "bytes=1048576-"),
    TestCase::new("closed", "bytes=0-65535"),
    TestCase::new("suffix", "bytes=-1024"),
    TestCase::new("malformed", "bytes=abc-def"),
];
