//! Native-messaging bridge to the browser side: replies complete pending host calls,
//! events are handed to the synchroniser.

pub mod codec;
pub mod host;
pub mod protocol;

use std::sync::Arc;

use anyhow::Result;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;

use crate::{error::MenuSyncError, sync::MenuSync};

pub use host::NativeBridge;
pub use protocol::{HostMethod, Inbound, Outbound};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Pump frames until the browser closes the channel or the synchroniser shuts down.
pub async fn serve<R, W>(
    mut reader: R,
    writer: W,
    bridge: Arc<NativeBridge>,
    queue: mpsc::UnboundedReceiver<Outbound>,
    sync: MenuSync,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let shutdown = sync.shutdown_token();
    let writer_task = tokio::spawn(write_loop(
        writer,
        queue,
        Arc::clone(&bridge),
        shutdown.clone(),
    ));

    let outcome = loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            frame = codec::read_frame(&mut reader) => frame,
        };
        let payload = match frame {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                log_info!("browser closed the native messaging channel");
                break Ok(());
            }
            Err(err) => break Err(err),
        };

        match codec::decode_message::<Inbound>(&payload) {
            Ok(Inbound::Reply {
                request_id,
                result,
                error,
            }) => bridge.complete(request_id, error.map_or(Ok(result), Err)),
            Ok(Inbound::Event { event }) => {
                // Handlers wait on host replies, which arrive through this loop.
                let sync = sync.clone();
                tokio::spawn(async move {
                    if let Err(err) = sync.handle_event(event).await {
                        report_event_error(&err);
                    }
                });
            }
            Err(err) => log_warn!("dropping frame: {err:#}"),
        }
    };

    sync.shutdown();
    bridge.close();
    writer_task.abort();
    outcome
}

/// Drain the outbound queue. A frame that cannot be encoded is dropped (its call
/// fails); a failed write ends the session and fails every waiting call.
async fn write_loop<W>(
    mut writer: W,
    mut queue: mpsc::UnboundedReceiver<Outbound>,
    bridge: Arc<NativeBridge>,
    shutdown: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = queue.recv().await {
        let payload = match codec::encode_message(&frame) {
            Ok(payload) => payload,
            Err(err) => {
                log_warn!("dropping outbound frame: {err:#}");
                if let Outbound::Call { request_id, .. } = frame {
                    bridge.complete(request_id, Err(format!("{err:#}")));
                }
                continue;
            }
        };
        if let Err(err) = codec::write_frame(&mut writer, &payload).await {
            log_error!("native messaging write failed: {err:#}");
            break;
        }
    }
    bridge.close();
    shutdown.cancel();
}

fn report_event_error(err: &MenuSyncError) {
    match err {
        MenuSyncError::UnknownMenuAction(_) => log_debug!("{err}"),
        _ if err.aborts_cycle() => log_warn!("{err}"),
        _ => log_debug!("{err}"),
    }
}
