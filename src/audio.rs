use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AddEventListenerOptions, HtmlAudioElement};

use crate::api::ClientError;
use crate::config::ClientConfig;
use crate::{error, log};

// --- AUDIO ---

pub struct AudioController {
    music: Option<HtmlAudioElement>,
    config: ClientConfig,
}

impl AudioController {
    pub fn new(music: Option<HtmlAudioElement>, config: ClientConfig) -> AudioController {
        AudioController { music, config }
    }

    /// Tries to autoplay the background track. When the browser blocks it,
    /// playback is retried once on the next click anywhere on the page.
    pub async fn start_music(&self) {
        let Some(music) = self.music.clone() else { return };
        music.set_volume(self.config.music_volume);

        let attempt = match music.play() {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = attempt {
            log(&format!("Background music autoplay was blocked, waiting for a click: {:?}", e));
            if let Err(e) = defer_until_click(music) {
                error(&format!("Could not register music fallback: {}", e));
            }
        }
    }

    /// Fire-and-forget; overlapping effects each get their own element.
    pub fn play_effect(&self, name: &str) {
        let src = self.config.effect_src(name);
        match HtmlAudioElement::new_with_src(&src) {
            Ok(clip) => {
                clip.set_volume(self.config.effect_volume);
                play_logged(&clip, src);
            }
            Err(e) => error(&format!("Could not create sound effect {}: {:?}", src, e)),
        }
    }
}

/// Starts playback and logs a rejected play promise instead of leaving it
/// unhandled.
fn play_logged(audio: &HtmlAudioElement, what: String) {
    match audio.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log(&format!("Could not play {}: {:?}", what, e));
            }
        }),
        Err(e) => log(&format!("Could not play {}: {:?}", what, e)),
    }
}

fn defer_until_click(music: HtmlAudioElement) -> Result<(), ClientError> {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or_else(|| ClientError::MissingElement("body".to_string()))?;

    let closure = Closure::wrap(Box::new(move || {
        play_logged(&music, "background music".to_string());
    }) as Box<dyn FnMut()>);

    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    body.add_event_listener_with_callback_and_add_event_listener_options(
        "click",
        closure.as_ref().unchecked_ref(),
        &opts,
    )?;
    closure.forget();
    Ok(())
}
