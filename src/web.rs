//! Browser bindings: the affordances over `web_sys`, exported to page scripts.

use anyhow::{Context as _, anyhow};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::clipboard::{self, Clipboard, LocalTask};
use crate::document::{ClassList, Document};
use crate::storage::KeyValueStore;
use crate::tts::{self, AudioOutput};
use crate::{menu, theme};

fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(s) => anyhow!(s),
        None => anyhow!("{:?}", value),
    }
}

fn to_js(err: anyhow::Error) -> JsValue {
    js_sys::Error::new(&format!("{err:#}")).into()
}

fn window() -> anyhow::Result<web_sys::Window> {
    web_sys::window().context("no global window")
}

pub struct BrowserDocument(web_sys::Document);

impl BrowserDocument {
    fn current() -> anyhow::Result<Self> {
        window()?
            .document()
            .map(Self)
            .context("window has no document")
    }
}

pub struct BrowserElement(web_sys::Element);

impl ClassList for BrowserElement {
    fn toggle_class(&self, class: &str) -> bool {
        match self.0.class_list().toggle(class) {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(error = ?e, class, "classList.toggle failed");
                self.has_class(class)
            }
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            tracing::warn!(error = ?e, class, "classList.add failed");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }
}

impl Document for BrowserDocument {
    type Element = BrowserElement;

    fn body(&self) -> anyhow::Result<BrowserElement> {
        let body = self.0.body().context("document has no body")?;
        Ok(BrowserElement(body.into()))
    }

    fn element_by_id(&self, id: &str) -> Option<BrowserElement> {
        self.0.get_element_by_id(id).map(BrowserElement)
    }
}

/// `window.localStorage`.
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    fn current() -> anyhow::Result<Self> {
        window()?
            .local_storage()
            .map_err(js_error)?
            .map(Self)
            .context("localStorage unavailable")
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.set_item(key, value).map_err(js_error)
    }
}

/// `navigator.clipboard`, looked up dynamically since some contexts lack it.
pub struct NavigatorClipboard(JsValue);

impl NavigatorClipboard {
    fn current() -> Option<Self> {
        let navigator = web_sys::window()?.navigator();
        Self::from_navigator(&navigator)
    }

    fn from_navigator(navigator: &JsValue) -> Option<Self> {
        let clipboard = js_sys::Reflect::get(navigator, &JsValue::from_str("clipboard")).ok()?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return None;
        }
        Some(Self(clipboard))
    }

    fn start_write(&self, text: &str) -> anyhow::Result<js_sys::Promise> {
        let write = js_sys::Reflect::get(&self.0, &JsValue::from_str("writeText"))
            .map_err(js_error)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| anyhow!("clipboard.writeText is not a function"))?;
        write
            .call1(&self.0, &JsValue::from_str(text))
            .map_err(js_error)?
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| anyhow!("clipboard.writeText did not return a promise"))
    }
}

impl Clipboard for NavigatorClipboard {
    fn write_text(&self, text: &str) -> LocalTask<anyhow::Result<()>> {
        let started = self.start_write(text);
        Box::pin(async move {
            JsFuture::from(started?).await.map_err(js_error)?;
            Ok(())
        })
    }
}

/// Plays through a fresh `<audio>` element per call.
pub struct HtmlAudio;

impl AudioOutput for HtmlAudio {
    async fn play(&self, src: &str) -> anyhow::Result<()> {
        let audio = web_sys::HtmlAudioElement::new_with_src(src).map_err(js_error)?;
        let started = audio.play().map_err(js_error)?;
        JsFuture::from(started).await.map_err(js_error)?;
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let run = || -> anyhow::Result<()> {
        let document = BrowserDocument::current()?;
        let storage = LocalStorage::current()?;
        theme::init_theme(&document, &storage)?;
        Ok(())
    };
    run().map_err(to_js)
}

#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> Result<(), JsValue> {
    let run = || -> anyhow::Result<()> {
        let document = BrowserDocument::current()?;
        let storage = LocalStorage::current()?;
        theme::toggle_theme(&document, &storage)?;
        Ok(())
    };
    run().map_err(to_js)
}

#[wasm_bindgen(js_name = toggleMenu)]
pub fn toggle_menu() {
    if let Ok(document) = BrowserDocument::current() {
        menu::toggle_menu(&document);
    }
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub fn copy_to_clipboard(text: &str) {
    let capability = NavigatorClipboard::current();
    clipboard::copy_to_clipboard(capability.as_ref(), text, wasm_bindgen_futures::spawn_local);
}

#[wasm_bindgen(js_name = playText)]
pub async fn play_text(text: String, lang: Option<String>) -> Result<(), JsValue> {
    tts::play_text(&HtmlAudio, &text, lang.as_deref())
        .await
        .map_err(to_js)
}
