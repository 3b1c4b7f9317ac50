use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;

use crate::broadcast::ChangeHub;
use crate::models::event::EventType;

/// GET /ws/{event} - WebSocket feed of change cues for one party.
///
/// Standings are public, so the feed is too; messages carry no data
/// beyond what changed, and clients re-fetch over HTTP.
pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    hub: web::Data<ChangeHub>,
    path: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let party = match path.parse::<EventType>() {
        Ok(party) => party,
        Err(_) => return Ok(HttpResponse::NotFound().finish()),
    };

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let hub = hub.into_inner();
    let mut sub = hub.subscribe(party);
    log::debug!(
        "ws subscriber {} joined {party} ({} connected)",
        sub.id,
        hub.subscriber_count(party)
    );

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                Some(msg) = sub.rx.recv() => {
                    if ws_session.text(msg).await.is_err() {
                        break;
                    }
                }
                Some(Ok(msg)) = msg_stream.recv() => {
                    match msg {
                        Message::Ping(bytes) => {
                            if ws_session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        Message::Text(_) => {
                            // Clients act through the HTTP API, not WS
                        }
                        _ => {}
                    }
                }
                else => break,
            }
        }

        hub.unsubscribe(party, sub.id);
        log::debug!("ws subscriber {} left {party}", sub.id);
    });

    Ok(response)
}
