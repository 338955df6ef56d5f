use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use coachsite_core::{Site, SiteConfig, ToastKind};

mod host;
mod logger;
mod runtime;

use host::WebHost;
use runtime::Runtime;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// The page's interaction layer. Keep the instance alive for as long as the
/// page is shown; dropping it detaches every listener, timer and observer.
#[wasm_bindgen]
pub struct CoachSite {
    runtime: Rc<RefCell<Runtime>>,
    config: SiteConfig,
}

impl CoachSite {
    fn runtime(&self, op: &str) -> Result<RefMut<'_, Runtime>, JsError> {
        self.runtime
            .try_borrow_mut()
            .map_err(|_| JsError::new(&format!("{op}: site is busy")))
    }
}

#[wasm_bindgen]
impl CoachSite {
    /// Create the site. Pass a (partial) config object or undefined/null for defaults.
    /// Example:
    ///   new CoachSite({ references: { swipe_threshold_px: 40 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CoachSite, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        logger::init();

        let config: SiteConfig = if jsvalue_is_undefined_or_null(&config) {
            SiteConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let window = web_sys::window().ok_or_else(|| JsError::new("no window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document available"))?;
        let runtime = Rc::new_cyclic(|weak| {
            RefCell::new(Runtime {
                host: WebHost::new(window, document, weak.clone()),
                site: None,
            })
        });
        Ok(CoachSite { runtime, config })
    }

    /// Wire every controller to the current document. Call once the DOM is
    /// ready; later calls are ignored.
    pub fn mount(&self) -> Result<(), JsError> {
        let mut rt = self.runtime("mount")?;
        if rt.site.is_some() {
            log::warn!("mount called on a mounted site, ignored");
            return Ok(());
        }
        let Runtime { host, site } = &mut *rt;
        *site = Some(Site::init(host, &self.config));
        log::info!("coach site mounted");
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.runtime.try_borrow().is_ok_and(|rt| rt.site.is_some())
    }

    /// Show a toast. `kind` is one of success, error, info (default) or warning.
    #[wasm_bindgen(js_name = show_notification)]
    pub fn show_notification(&self, message: String, kind: Option<String>) -> Result<(), JsError> {
        let kind = match kind.as_deref() {
            None => ToastKind::default(),
            Some(raw) => raw
                .parse::<ToastKind>()
                .map_err(|_| JsError::new(&format!("unknown notification kind '{raw}'")))?,
        };
        let mut rt = self.runtime("show_notification")?;
        let Runtime { host, site } = &mut *rt;
        let site = site
            .as_mut()
            .ok_or_else(|| JsError::new("show_notification: call mount() first"))?;
        site.notify(host, &message, kind);
        Ok(())
    }

    /// Start index of the gallery, or undefined without a gallery.
    #[wasm_bindgen(js_name = gallery_index)]
    pub fn gallery_index(&self) -> Option<u32> {
        let rt = self.runtime.try_borrow().ok()?;
        let gallery = rt.site.as_ref()?.gallery.as_ref()?;
        Some(gallery.state().current_index() as u32)
    }

    /// Current card of the references carousel, or undefined without one.
    #[wasm_bindgen(js_name = references_index)]
    pub fn references_index(&self) -> Option<u32> {
        let rt = self.runtime.try_borrow().ok()?;
        let references = rt.site.as_ref()?.references.as_ref()?;
        Some(references.state().current_index() as u32)
    }

    /// Effective configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.config).map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
