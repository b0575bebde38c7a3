//! Prometheus exporter scaffolds for components declaring a metrics namespace

use crate::errors::{CodegenError, TemplateError};
use crate::template::{escape_js, render, TemplateContext};
use cireg_manifest::{is_valid_component_id, is_valid_metrics_namespace, IntegrationManifest};
use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Node.js `prom-client` metrics server
pub const EXPORTER_TEMPLATE: &str = r"// {{component_id}} metrics exporter
// Generated by cireg. cireg never overwrites this file once it exists.
'use strict';

const http = require('http');
const client = require('prom-client');

const PORT = Number(process.env.METRICS_PORT || {{port}});
const register = new client.Registry();

client.collectDefaultMetrics({ register, prefix: '{{namespace}}_' });

const httpRequestsTotal = new client.Counter({
  name: '{{namespace}}_http_requests_total',
  help: 'Total HTTP requests handled by {{component_id}}',
  labelNames: ['method', 'route', 'status'],
  registers: [register],
});

const httpRequestDuration = new client.Histogram({
  name: '{{namespace}}_http_request_duration_seconds',
  help: 'HTTP request latency for {{component_id}} in seconds',
  labelNames: ['method', 'route'],
  buckets: [0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1, 2.5, 5],
  registers: [register],
});

const activeConnections = new client.Gauge({
  name: '{{namespace}}_active_connections',
  help: 'Open connections to {{component_id}}',
  registers: [register],
});

const componentInfo = new client.Gauge({
  name: '{{namespace}}_component_info',
  help: 'Static information about {{component_id}}',
  labelNames: ['component_id', 'version', 'domain'],
  registers: [register],
});
componentInfo.set({ component_id: '{{component_id}}', version: '{{version}}', domain: '{{domain}}' }, 1);

const server = http.createServer(async (req, res) => {
  const route = req.url.split('?')[0];
  const endTimer = httpRequestDuration.startTimer({ method: req.method, route });
  let status = 200;

  try {
    if (route === '/health') {
      res.writeHead(status, { 'Content-Type': 'application/json' });
      res.end(JSON.stringify({ status: 'ok', component: '{{component_id}}', timestamp: new Date().toISOString() }));
    } else if (route === '/metrics') {
      const body = await register.metrics();
      res.writeHead(status, { 'Content-Type': register.contentType });
      res.end(body);
    } else {
      status = 404;
      res.writeHead(status, { 'Content-Type': 'application/json' });
      res.end(JSON.stringify({ error: 'not found' }));
    }
  } catch (err) {
    status = 500;
    if (!res.headersSent) {
      res.writeHead(status, { 'Content-Type': 'text/plain' });
    }
    res.end(String(err));
  } finally {
    httpRequestsTotal.inc({ method: req.method, route, status });
    endTimer();
  }
});

server.on('connection', (socket) => {
  activeConnections.inc();
  socket.on('close', () => activeConnections.dec());
});

server.listen(PORT, () => {
  console.log(`{{component_id}} exporter listening on :${PORT} (/health, /metrics)`);
});

module.exports = { server, register };
";

/// Values substituted into [`EXPORTER_TEMPLATE`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterContext {
    pub component_id: String,
    pub namespace: String,
    pub port: u16,
    pub version: String,
    pub domain: String,
}

impl ExporterContext {
    /// Context for `manifest`, or `None` when it declares no namespace
    pub fn from_manifest(manifest: &IntegrationManifest) -> Option<Self> {
        let namespace = manifest.effective_namespace()?;
        Some(ExporterContext {
            component_id: manifest.component_id.clone(),
            namespace,
            port: manifest.effective_port(),
            version: manifest.version.clone(),
            domain: manifest.domain.clone(),
        })
    }
}

impl TemplateContext for ExporterContext {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        let value = match key {
            "component_id" => escape_js(&self.component_id),
            "namespace" => escape_js(&self.namespace),
            "port" => self.port.to_string(),
            "version" => escape_js(&self.version),
            "domain" => escape_js(&self.domain),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}

/// What [`ExporterGenerator::generate`] did for one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExporterOutcome {
    Written(PathBuf),
    /// An exporter already exists at this path and was left untouched
    Exists(PathBuf),
    /// The manifest declares no metrics namespace
    NoNamespace,
}

#[derive(Debug, Clone)]
pub struct ExporterGenerator {
    out_dir: PathBuf,
}

impl ExporterGenerator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        ExporterGenerator {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Deterministic output path for `component_id`
    pub fn exporter_path(&self, component_id: &str) -> PathBuf {
        self.out_dir.join(format!("{}-exporter.js", component_id))
    }

    /// Render the exporter source, or `None` when no namespace is declared
    pub fn render(&self, manifest: &IntegrationManifest) -> Result<Option<String>, TemplateError> {
        ExporterContext::from_manifest(manifest)
            .map(|ctx| render(EXPORTER_TEMPLATE, &ctx))
            .transpose()
    }

    /// Write the exporter for `manifest` unless one already exists
    ///
    /// The file is opened with `create_new`, so an existing exporter is never
    /// truncated even if it appears between the check and the write. The id
    /// must be a valid slug and the namespace a valid metric name prefix.
    pub fn generate(
        &self,
        manifest: &IntegrationManifest,
    ) -> Result<ExporterOutcome, CodegenError> {
        if !is_valid_component_id(&manifest.component_id) {
            return Err(CodegenError::InvalidComponentId(
                manifest.component_id.clone(),
            ));
        }
        if let Some(namespace) = manifest.effective_namespace() {
            if !is_valid_metrics_namespace(&namespace) {
                return Err(CodegenError::InvalidNamespace {
                    component_id: manifest.component_id.clone(),
                    namespace,
                });
            }
        }

        let path = self.exporter_path(&manifest.component_id);
        if path.exists() {
            debug!("Exporter exists: {}", path.display());
            return Ok(ExporterOutcome::Exists(path));
        }

        let Some(source) = self.render(manifest)? else {
            return Ok(ExporterOutcome::NoNamespace);
        };

        fs::create_dir_all(&self.out_dir).map_err(|e| CodegenError::io(&self.out_dir, e))?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(ExporterOutcome::Exists(path));
            }
            Err(e) => return Err(CodegenError::io(&path, e)),
        };
        file.write_all(source.as_bytes())
            .map_err(|e| CodegenError::io(&path, e))?;

        info!("Generated exporter {}", path.display());
        Ok(ExporterOutcome::Written(path))
    }

    /// Run [`generate`](Self::generate) over every manifest, in order
    pub fn generate_all<'m>(
        &self,
        manifests: &'m [IntegrationManifest],
    ) -> Result<Vec<(&'m str, ExporterOutcome)>, CodegenError> {
        manifests
            .iter()
            .map(|m| {
                self.generate(m)
                    .map(|outcome| (m.component_id.as_str(), outcome))
            })
            .collect()
    }
}
