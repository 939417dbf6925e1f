//! Provider host serve loop
//!
//! Answers engine requests over line-delimited JSON frames: one request per
//! line on stdin, one response per line on stdout. The engine owns the outer
//! protocol, ordering, retries, and rollback; this host only constructs
//! components, relays attribute resolutions into deferred values, and
//! reports outputs.
//!
//! Request frames:
//! - `{"method":"get-schema"}`
//! - `{"method":"construct","type":...,"name":...,"inputs":{...}}`
//! - `{"method":"resolve","construction":...,"resource":...,"attribute":...,"value":...}`
//! - `{"method":"fail","construction":...,"resource":...,"attribute":...,"message":...}`
//! - `{"method":"outputs","construction":...}`
//! - `{"method":"complete","construction":...}`
//!
//! Responses are `{"ok": ...}` or `{"error": "..."}`. The engine sends
//! `complete` once it is done with a construction; the host drops the
//! construction state so a long-lived host does not accumulate it.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::ComponentContext;
use crate::registry::Registry;

/// A single request frame from the engine
#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Request {
    /// Advertise exported component schemas
    GetSchema,
    /// Construct a component instance
    Construct {
        #[serde(rename = "type")]
        type_token: String,
        name: String,
        #[serde(default)]
        inputs: Value,
    },
    /// Report a computed attribute value back into the construction
    Resolve {
        construction: String,
        resource: String,
        attribute: String,
        value: String,
    },
    /// Report an engine-side failure for a computed attribute
    Fail {
        construction: String,
        resource: String,
        attribute: String,
        message: String,
    },
    /// Read the construction's published outputs
    Outputs { construction: String },
    /// Discard a construction the engine is done with
    Complete { construction: String },
}

/// Provider host state: live constructions keyed by id
pub struct Host {
    constructions: HashMap<String, ComponentContext>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    pub fn new() -> Self {
        Self {
            constructions: HashMap::new(),
        }
    }

    /// Handle one request frame
    pub fn handle(&mut self, request: Request) -> Value {
        match self.dispatch(request) {
            Ok(value) => json!({ "ok": value }),
            Err(err) => {
                warn!(error = %err, "Request failed");
                json!({ "error": err.to_string() })
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> Result<Value> {
        match request {
            Request::GetSchema => Ok(json!({ "components": Registry::schemas() })),

            Request::Construct {
                type_token,
                name,
                inputs,
            } => {
                let ctx = Registry::construct(&type_token, &name, &inputs)?;
                let id = Uuid::now_v7().to_string();
                info!(
                    construction = %id,
                    type_token = %type_token,
                    name = %name,
                    declarations = ctx.declarations().len(),
                    "Constructed component"
                );

                let declarations: Vec<Value> =
                    ctx.declarations().iter().map(|d| d.snapshot()).collect();
                let outputs: Vec<&String> = ctx.outputs().keys().collect();
                let response = json!({
                    "construction": id,
                    "declarations": declarations,
                    "outputs": outputs,
                });
                self.constructions.insert(id, ctx);
                Ok(response)
            }

            Request::Resolve {
                construction,
                resource,
                attribute,
                value,
            } => {
                let ctx = self.construction_mut(&construction)?;
                if !ctx.resolve_attribute(&resource, &attribute, value) {
                    bail!("no pending attribute '{attribute}' on resource '{resource}'");
                }
                // A locally-derived value may have failed during resolution
                // (policy serialization); report it immediately.
                let failure = ctx.failure().map(|err| err.to_string());
                Ok(json!({ "resolved": true, "failure": failure }))
            }

            Request::Fail {
                construction,
                resource,
                attribute,
                message,
            } => {
                let ctx = self.construction_mut(&construction)?;
                if !ctx.fail_attribute(&resource, &attribute, &message) {
                    bail!("no pending attribute '{attribute}' on resource '{resource}'");
                }
                Ok(json!({ "failed": true }))
            }

            Request::Outputs { construction } => {
                let ctx = self.construction_mut(&construction)?;
                if let Some(failure) = ctx.failure() {
                    bail!("construction failed: {failure}");
                }
                let outputs: Value = ctx
                    .outputs()
                    .iter()
                    .map(|(name, output)| (name.clone(), json!(output.get())))
                    .collect::<serde_json::Map<String, Value>>()
                    .into();
                Ok(json!({ "outputs": outputs }))
            }

            Request::Complete { construction } => {
                if self.constructions.remove(&construction).is_none() {
                    bail!("unknown construction '{construction}'");
                }
                debug!(construction = %construction, "Dropped completed construction");
                Ok(json!({ "completed": true }))
            }
        }
    }

    fn construction_mut(&mut self, id: &str) -> Result<&mut ComponentContext> {
        match self.constructions.get_mut(id) {
            Some(ctx) => Ok(ctx),
            None => bail!("unknown construction '{id}'"),
        }
    }

    /// Serve frames until the reader closes
    pub async fn serve<R, W>(mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read request frame")?
        {
            if line.trim().is_empty() {
                continue;
            }
            debug!(frame = %line, "Received request frame");

            let response = match serde_json::from_str::<Request>(&line) {
                Ok(request) => self.handle(request),
                Err(err) => json!({ "error": format!("malformed request: {err}") }),
            };

            let mut frame =
                serde_json::to_string(&response).context("Failed to encode response frame")?;
            frame.push('\n');
            writer
                .write_all(frame.as_bytes())
                .await
                .context("Failed to write response frame")?;
            writer
                .flush()
                .await
                .context("Failed to flush response frame")?;
        }

        info!("Engine closed the request stream, shutting down");
        Ok(())
    }
}

/// Run the host over stdio until the engine disconnects
pub async fn run() -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    Host::new().serve(stdin, stdout).await
}
