//! Import resolution over the local filesystem and HTTPS.
//!
//! [`Importer`] resolves Jsonnet import specifiers to content. Specifiers
//! starting with a double slash (`//host/path`) are network paths fetched
//! via HTTPS using the importer's [`UrlFetcher`]; everything else is read
//! from the local filesystem. An empty specifier, `-`, or `/dev/stdin` means
//! standard input, which is never resolved relative to a directory.
//!
//! Relative specifiers are searched first relative to the directory of the
//! importing source, then under each search path entry in order. Once a
//! location is fetched with data or with a definitive not-found result, that
//! outcome is cached for the lifetime of the importer, so the same import
//! from different files cannot yield different content. Hard fetch errors
//! are never cached; an identical later request retries. There is no cache
//! expiry logic. The cache is mutex-protected, so one importer may be shared
//! across evaluator instances and threads; the cache is shared too.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::{env, fmt, fs, io};

use ureq::http::StatusCode;

use crate::error::ImportError;
use crate::netpath;

/// Canonical marker for standard input. Aliases (`-`, `/dev/stdin`) are
/// normalized to this before resolution so imports from stdin-read code are
/// not searched relative to `/dev`.
const STDIN: &str = "";

/// The filesystem path actually opened for the stdin marker.
const STDIN_PATH: &str = "/dev/stdin";

/// Immutable content of a successfully fetched resource. Cheap to clone;
/// cache hits share one allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contents(Arc<str>);

impl Contents {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Contents {
    fn from(s: String) -> Self {
        Contents(Arc::from(s))
    }
}

impl From<&str> for Contents {
    fn from(s: &str) -> Self {
        Contents(Arc::from(s))
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A status/body pair returned by a [`UrlFetcher`].
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Capability to GET a URL. The production implementation is
/// [`HttpFetcher`]; tests substitute a fake. Implementations must be safe
/// for concurrent use if the importer is shared across threads, and any
/// request deadline is theirs to enforce - the importer imposes none.
pub trait UrlFetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<Response, Box<dyn Error + Send + Sync>>;
}

/// Default [`UrlFetcher`] backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlFetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<Response, Box<dyn Error + Send + Sync>> {
        match self.agent.get(url).call() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.into_body().read_to_string()?;
                Ok(Response { status, body })
            }
            // ureq reports non-2xx statuses as errors; surface them as
            // responses so the importer applies its own status mapping.
            Err(ureq::Error::StatusCode(status)) => Ok(Response {
                status,
                body: String::new(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Outcome of fetching one candidate location. Hard errors are not
/// represented here: they propagate as `Err` and are never cached.
#[derive(Clone)]
enum Outcome {
    Found(Contents),
    Absent,
}

/// Resolves Jsonnet imports from the filesystem and HTTPS network paths,
/// caching results. See the [module docs](self) for resolution and caching
/// rules.
pub struct Importer {
    search_path: Vec<String>,
    fetcher: Box<dyn UrlFetcher>,
    cache: Mutex<HashMap<String, Outcome>>,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

impl Importer {
    /// Creates an importer with an empty search path and the default
    /// [`HttpFetcher`] transport.
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(HttpFetcher::new()))
    }

    /// Creates an importer using the given transport.
    pub fn with_fetcher(fetcher: Box<dyn UrlFetcher>) -> Self {
        Importer {
            search_path: Vec::new(),
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The current search path, in probe order.
    pub fn search_path(&self) -> &[String] {
        &self.search_path
    }

    /// Appends one entry to the search path. Order is significant: entries
    /// are probed in insertion order, after the importing source's own
    /// directory.
    pub fn push_search_path(&mut self, path: impl Into<String>) {
        self.search_path.push(path.into());
    }

    /// Appends the entries of the OS-list-separated environment variable
    /// `var` to the search path, preserving their order and skipping empty
    /// elements. Entries from the environment always follow explicitly
    /// configured ones.
    pub fn append_search_from_env(&mut self, var: &str) {
        let Ok(value) = env::var(var) else { return };
        for p in env::split_paths(&value) {
            if p.as_os_str().is_empty() {
                continue;
            }
            self.search_path.push(p.to_string_lossy().into_owned());
        }
    }

    /// Resolves `spec`, imported from the file or network location `source`,
    /// and returns its content together with the canonical location it was
    /// found at. The caller feeds that canonical location back in as
    /// `source` when resolving nested imports.
    ///
    /// A relative `spec` is searched relative to the directory of `source`
    /// first, then under each search path entry in order. If no candidate
    /// has the resource, a [`ImportError::NotFound`] naming `spec` is
    /// returned; any hard fetch error aborts the search immediately.
    pub fn import(&self, source: &str, spec: &str) -> Result<(Contents, String), ImportError> {
        let spec = map_stdin(spec);
        let dir = source_dir(source);
        match self.search(spec, &dir)? {
            Some(found) => Ok(found),
            None => Err(ImportError::NotFound {
                spec: spec.to_string(),
            }),
        }
    }

    /// Probes candidate locations for `spec` in order. `Ok(None)` means
    /// every candidate was definitively absent.
    fn search(&self, spec: &str, dir: &str) -> Result<Option<(Contents, String)>, ImportError> {
        // Rooted specifiers (including netpaths) and stdin ignore the
        // search path: there is exactly one candidate.
        if spec == STDIN || netpath::is_abs(spec) {
            return match self.read_via_cache(spec)? {
                Outcome::Found(contents) => Ok(Some((contents, spec.to_string()))),
                Outcome::Absent => Ok(None),
            };
        }

        for prefix in std::iter::once(dir).chain(self.search_path.iter().map(String::as_str)) {
            let location = netpath::preserve_net_root(prefix, &netpath::join(prefix, spec));
            match self.read_via_cache(&location)? {
                Outcome::Found(contents) => return Ok(Some((contents, location))),
                Outcome::Absent => {}
            }
        }

        Ok(None)
    }

    /// Returns the cached outcome for `location`, fetching on a miss.
    /// Successful fetches (content or definitive absence) populate the
    /// cache; hard errors do not, so a later identical lookup retries.
    fn read_via_cache(&self, location: &str) -> Result<Outcome, ImportError> {
        if let Some(outcome) = self.cache.lock().unwrap().get(location) {
            return Ok(outcome.clone());
        }

        // Fetch without holding the lock. If two threads race on the same
        // location, the first insert wins and the other result is dropped,
        // keeping one immutable value per location.
        let outcome = self.fetch(location)?;
        let mut cache = self.cache.lock().unwrap();
        Ok(cache
            .entry(location.to_string())
            .or_insert(outcome)
            .clone())
    }

    fn fetch(&self, location: &str) -> Result<Outcome, ImportError> {
        if netpath::is_netpath(location) {
            self.fetch_url(location)
        } else {
            read_file(location)
        }
    }

    /// GETs `https:` + the netpath. 200 is content, 404 is definitive
    /// absence, anything else is a hard error.
    fn fetch_url(&self, location: &str) -> Result<Outcome, ImportError> {
        let url = format!("https:{location}");
        let resp = self
            .fetcher
            .get(&url)
            .map_err(|err| ImportError::Transport {
                location: location.to_string(),
                message: err.to_string(),
            })?;
        match resp.status {
            200 => Ok(Outcome::Found(Contents::from(resp.body))),
            404 => Ok(Outcome::Absent),
            status => Err(ImportError::Status {
                location: location.to_string(),
                status: status_text(status),
            }),
        }
    }
}

/// Reads a local file. Not-exists is definitive absence; any other failure
/// (permissions, a directory, invalid encoding) is a hard error.
fn read_file(location: &str) -> Result<Outcome, ImportError> {
    let path = if location == STDIN { STDIN_PATH } else { location };
    match fs::read_to_string(path) {
        Ok(body) => Ok(Outcome::Found(Contents::from(body))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Outcome::Absent),
        Err(err) => Err(ImportError::Io {
            location: location.to_string(),
            source: err,
        }),
    }
}

/// Directory a relative import from `source` is first resolved against.
fn source_dir(source: &str) -> String {
    let dir = netpath::preserve_net_root(source, &netpath::dir(source));
    // A bare-host netpath has no path segment to take the parent of; its
    // directory is the source itself, not a malformed "//" root.
    if dir == "//" {
        source.to_string()
    } else {
        dir
    }
}

fn map_stdin(spec: &str) -> &str {
    if spec == STDIN_PATH || spec == "-" {
        STDIN
    } else {
        spec
    }
}

fn status_text(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("{status} {reason}"),
        None => format!("status {status}"),
    }
}
