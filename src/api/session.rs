//! WASM-owned editor session
//!
//! One in-memory editor plus one instance of every registered menu. Modules
//! are registered into the page-wide registry before the editor exists;
//! once an editor holds the registry it is frozen.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::{config_from_js, deserialize, js_error, serialize};
use crate::editor::{Activation, EditorHost, MemoryEditor, PluginRegistry};
use crate::formula::FormulaConfig;
use crate::menu::{CommitOutcome, FocusRequest, ModalMenu};
use crate::models::{HostDefaults, Path, Point, Range};
use crate::plugin::{formula_module, MODULE_NAME};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

struct EditorSession {
    editor: MemoryEditor,
    menus: BTreeMap<&'static str, Box<dyn ModalMenu>>,
}

impl EditorSession {
    fn new(plugins: Arc<PluginRegistry>, config: FormulaConfig) -> Self {
        let menus = plugins
            .menu_keys()
            .into_iter()
            .filter_map(|key| plugins.create_menu(key, &config).map(|menu| (key, menu)))
            .collect();
        Self {
            editor: MemoryEditor::new(plugins, config),
            menus,
        }
    }

    /// Open one dialog. Any dialog already up is torn down first and the
    /// selection it saved is given back before enablement is checked.
    fn open_menu(&mut self, key: &str) -> Result<(&'static str, FocusRequest), String> {
        if !self.menus.contains_key(key) {
            return Err(format!("Unknown menu: {}", key));
        }
        for (other, menu) in self.menus.iter_mut() {
            if *other != key && menu.is_open() {
                menu.cancel();
            }
        }
        self.editor.restore_selection();

        let menu = self
            .menus
            .get_mut(key)
            .ok_or_else(|| format!("Unknown menu: {}", key))?;
        let focus = menu.open(&self.editor).map_err(|e| e.to_string())?;
        // the dialog takes focus; keep the selection for commit
        self.editor.blur();
        Ok((menu.key(), focus))
    }
}

lazy_static! {
    static ref PLUGINS: Mutex<Option<Arc<PluginRegistry>>> = Mutex::new(None);
    static ref SESSION: Mutex<Option<EditorSession>> = Mutex::new(None);
}

fn with_session<T>(f: impl FnOnce(&mut EditorSession) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = SESSION.lock().map_err(|e| js_error("Editor session lock poisoned", e))?;
    let session = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No editor session; call createEditor first"))?;
    f(session)
}

fn menu_of<'a>(session: &'a mut EditorSession, key: &str) -> Result<&'a mut Box<dyn ModalMenu>, JsValue> {
    session
        .menus
        .get_mut(key)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown menu: {}", key)))
}

/// Install the formula module into a registry slot. Once an editor holds
/// the registry it can no longer change.
fn activate_in(slot: &mut Option<Arc<PluginRegistry>>, config: &FormulaConfig) -> Result<Activation, String> {
    let plugins = slot.get_or_insert_with(|| Arc::new(PluginRegistry::new(HostDefaults::default())));
    let already_active = plugins.is_active(MODULE_NAME);

    match Arc::get_mut(plugins) {
        Some(registry) => registry
            .register_module(formula_module(config))
            .map_err(|e| e.to_string()),
        None if already_active => Ok(Activation::AlreadyActive),
        None => Err("an editor already holds the registry".to_string()),
    }
}

fn activate(config: &FormulaConfig) -> Result<Activation, JsValue> {
    let mut guard = PLUGINS.lock().map_err(|e| js_error("Plugin registry lock poisoned", e))?;
    let activation =
        activate_in(&mut guard, config).map_err(|e| js_error("Failed to register formula module", e))?;
    wasm_info!("formula module: {:?}", activation);
    Ok(activation)
}

/// Activate the formula module in the page-wide registry
#[wasm_bindgen(js_name = registerFormulaModule)]
pub fn register_formula_module(config: JsValue) -> Result<String, JsValue> {
    let config = config_from_js(config)?;
    Ok(match activate(&config)? {
        Activation::Activated => "activated".to_string(),
        Activation::AlreadyActive => "alreadyActive".to_string(),
    })
}

/// Create (or replace) the editor session
#[wasm_bindgen(js_name = createEditor)]
pub fn create_editor(config: JsValue) -> Result<(), JsValue> {
    let config = config_from_js(config)?;
    if PLUGINS
        .lock()
        .map_err(|e| js_error("Plugin registry lock poisoned", e))?
        .is_none()
    {
        activate(&config)?;
    }
    let plugins = PLUGINS
        .lock()
        .map_err(|e| js_error("Plugin registry lock poisoned", e))?
        .clone()
        .ok_or_else(|| JsValue::from_str("Plugin registry missing"))?;

    let session = EditorSession::new(plugins, config);

    let mut guard = SESSION.lock().map_err(|e| js_error("Editor session lock poisoned", e))?;
    *guard = Some(session);
    wasm_info!("createEditor: session ready");
    Ok(())
}

#[wasm_bindgen(js_name = setHtml)]
pub fn set_html(html: &str) -> Result<(), JsValue> {
    with_session(|session| {
        session
            .editor
            .set_html(html)
            .map_err(|e| js_error("Failed to import HTML", e))
    })
}

#[wasm_bindgen(js_name = getHtml)]
pub fn get_html() -> Result<String, JsValue> {
    with_session(|session| Ok(session.editor.to_html()))
}

#[wasm_bindgen(js_name = getDocument)]
pub fn get_document() -> Result<JsValue, JsValue> {
    with_session(|session| serialize(&session.editor.children(), "Failed to serialize document"))
}

#[wasm_bindgen(js_name = renderDocument)]
pub fn render_document() -> Result<JsValue, JsValue> {
    with_session(|session| serialize(&session.editor.render(), "Failed to serialize visual tree"))
}

#[wasm_bindgen(js_name = setCaret)]
pub fn set_caret(path: JsValue, offset: usize) -> Result<(), JsValue> {
    let path: Path = deserialize(path, "Failed to deserialize caret path")?;
    with_session(|session| {
        session.editor.set_caret(path, offset);
        Ok(())
    })
}

#[wasm_bindgen(js_name = selectRange)]
pub fn select_range(
    anchor_path: JsValue,
    anchor_offset: usize,
    focus_path: JsValue,
    focus_offset: usize,
) -> Result<(), JsValue> {
    let anchor: Path = deserialize(anchor_path, "Failed to deserialize anchor path")?;
    let focus: Path = deserialize(focus_path, "Failed to deserialize focus path")?;
    with_session(|session| {
        session.editor.select(Range::new(
            Point::new(anchor, anchor_offset),
            Point::new(focus, focus_offset),
        ));
        Ok(())
    })
}

#[wasm_bindgen(js_name = blurEditor)]
pub fn blur_editor() -> Result<(), JsValue> {
    with_session(|session| {
        session.editor.blur();
        Ok(())
    })
}

#[wasm_bindgen(js_name = toolbarMenuKeys)]
pub fn toolbar_menu_keys() -> Result<JsValue, JsValue> {
    with_session(|session| {
        serialize(&session.editor.plugins().toolbar_insert_keys(), "Failed to serialize menu keys")
    })
}

#[wasm_bindgen(js_name = hoverbarMenuKeys)]
pub fn hoverbar_menu_keys(node_type: &str) -> Result<JsValue, JsValue> {
    with_session(|session| {
        serialize(
            &session.editor.plugins().hoverbar_menu_keys(node_type),
            "Failed to serialize menu keys",
        )
    })
}

/// Toolbar button state for one menu
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MenuInfo {
    key: &'static str,
    title: String,
    icon_svg: &'static str,
    tag: &'static str,
    show_modal: bool,
    modal_width: u32,
    is_active: bool,
    is_disabled: bool,
    value: String,
    position_path: Option<Path>,
    is_open: bool,
}

#[wasm_bindgen(js_name = menuInfo)]
pub fn menu_info(key: &str) -> Result<JsValue, JsValue> {
    with_session(|session| {
        let editor = &session.editor;
        let menu = session
            .menus
            .get(key)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown menu: {}", key)))?;
        let info = MenuInfo {
            key: menu.key(),
            title: menu.title().to_string(),
            icon_svg: menu.icon_svg(),
            tag: menu.tag(),
            show_modal: menu.show_modal(),
            modal_width: menu.modal_width(),
            is_active: menu.is_active(editor),
            is_disabled: menu.is_disabled(editor),
            value: menu.get_value(editor),
            position_path: menu.modal_position_node(editor),
            is_open: menu.is_open(),
        };
        serialize(&info, "Failed to serialize menu info")
    })
}

/// Open the dialog; returns the id of the textarea that will receive focus
#[wasm_bindgen(js_name = openMenu)]
pub fn open_menu(key: &str) -> Result<String, JsValue> {
    let (menu_key, focus) = with_session(|session| {
        session
            .open_menu(key)
            .map_err(|e| js_error("Failed to open menu", e))
    })?;

    schedule_focus(menu_key, focus.ticket)?;
    Ok(focus.element_id)
}

/// Focus the textarea on the next turn, unless the dialog changed meanwhile
fn schedule_focus(key: &'static str, ticket: u64) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let callback = Closure::once_into_js(move || focus_if_current(key, ticket));
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)?;
    Ok(())
}

fn focus_if_current(key: &'static str, ticket: u64) {
    let element_id = match SESSION.lock() {
        Ok(guard) => guard
            .as_ref()
            .and_then(|session| session.menus.get(key))
            .and_then(|menu| menu.focus_due(ticket))
            .map(str::to_string),
        Err(e) => {
            wasm_error!("editor session lock poisoned: {}", e);
            None
        }
    };
    let Some(element_id) = element_id else {
        wasm_log!("focus for {} skipped: dialog changed", key);
        return;
    };

    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&element_id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
    match element {
        Some(element) => {
            if let Err(e) = element.focus() {
                wasm_warn!("focus of #{} failed: {:?}", element_id, e);
            }
        }
        None => wasm_warn!("focus target #{} not in the page", element_id),
    }
}

#[wasm_bindgen(js_name = menuInput)]
pub fn menu_input(key: &str, value: &str) -> Result<(), JsValue> {
    with_session(|session| {
        menu_of(session, key)?.input(value);
        Ok(())
    })
}

/// Confirm click; returns `committed`, `emptyInput`, `stale` or `notOpen`
#[wasm_bindgen(js_name = commitMenu)]
pub fn commit_menu(key: &str) -> Result<String, JsValue> {
    with_session(|session| {
        let EditorSession { editor, menus } = session;
        let menu = menus
            .get_mut(key)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown menu: {}", key)))?;
        let outcome = menu
            .commit(editor)
            .map_err(|e| js_error("Failed to commit menu", e))?;
        wasm_log!("commitMenu {}: {:?}", key, outcome);
        Ok(match outcome {
            CommitOutcome::Committed => "committed",
            CommitOutcome::EmptyInput => "emptyInput",
            CommitOutcome::Stale => "stale",
            CommitOutcome::NotOpen => "notOpen",
        }
        .to_string())
    })
}

#[wasm_bindgen(js_name = cancelMenu)]
pub fn cancel_menu(key: &str) -> Result<(), JsValue> {
    with_session(|session| {
        menu_of(session, key)?.cancel();
        session.editor.restore_selection();
        Ok(())
    })
}

#[wasm_bindgen(js_name = dismissMenu)]
pub fn dismiss_menu(key: &str) -> Result<(), JsValue> {
    with_session(|session| {
        menu_of(session, key)?.dismiss();
        session.editor.restore_selection();
        Ok(())
    })
}

/// Page keyboard event while a dialog may be open
#[wasm_bindgen(js_name = menuKeyup)]
pub fn menu_keyup(key: &str, key_name: &str) -> Result<bool, JsValue> {
    with_session(|session| {
        let handled = menu_of(session, key)?.handle_key(key_name);
        if handled {
            session.editor.restore_selection();
        }
        Ok(handled)
    })
}

#[wasm_bindgen(js_name = menuContent)]
pub fn menu_content(key: &str) -> Result<JsValue, JsValue> {
    with_session(|session| {
        let menu = session
            .menus
            .get(key)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown menu: {}", key)))?;
        match menu.content() {
            Some(content) => serialize(&content, "Failed to serialize modal content"),
            None => Ok(JsValue::NULL),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::memory::paragraph;
    use crate::menu::edit::EDIT_FORMULA_KEY;
    use crate::menu::insert::INSERT_FORMULA_KEY;
    use crate::models::Node;
    use crate::FORMULA_TYPE;

    fn session() -> EditorSession {
        let mut slot = None;
        activate_in(&mut slot, &FormulaConfig::default()).unwrap();
        let mut session = EditorSession::new(slot.unwrap(), FormulaConfig::default());
        session.editor.set_children(vec![paragraph(vec![Node::text("area = ")])]);
        session.editor.set_caret(vec![0, 0], 7);
        session
    }

    /// Caret on the only formula of the document
    fn caret_on_formula(session: &mut EditorSession) {
        let (mut path, _) = session.editor.elements_of_type(FORMULA_TYPE).remove(0);
        path.push(0);
        session.editor.set_caret(path, 0);
    }

    #[test]
    fn test_activate_in_is_idempotent() {
        let config = FormulaConfig::default();
        let mut slot = None;
        assert_eq!(activate_in(&mut slot, &config), Ok(Activation::Activated));
        assert_eq!(activate_in(&mut slot, &config), Ok(Activation::AlreadyActive));

        // an editor holds the registry now
        let held = slot.clone();
        assert_eq!(activate_in(&mut slot, &config), Ok(Activation::AlreadyActive));
        drop(held);
    }

    #[test]
    fn test_activate_in_fails_on_held_registry_without_module() {
        let mut slot = Some(Arc::new(PluginRegistry::new(HostDefaults::default())));
        let held = slot.clone();
        assert!(activate_in(&mut slot, &FormulaConfig::default()).is_err());
        drop(held);
    }

    #[test]
    fn test_session_has_both_menus() {
        let session = session();
        assert!(session.menus.contains_key(INSERT_FORMULA_KEY));
        assert!(session.menus.contains_key(EDIT_FORMULA_KEY));
    }

    #[test]
    fn test_reopen_same_menu_keeps_selection() {
        let mut session = session();
        let (key, first) = session.open_menu(INSERT_FORMULA_KEY).unwrap();
        assert_eq!(key, INSERT_FORMULA_KEY);
        assert!(session.editor.selection().is_none());

        let (_, second) = session.open_menu(INSERT_FORMULA_KEY).unwrap();
        assert!(second.ticket > first.ticket);

        let EditorSession { editor, menus } = &mut session;
        let insert = menus.get_mut(INSERT_FORMULA_KEY).unwrap();
        assert!(insert.is_open());
        assert!(insert.focus_due(first.ticket).is_none());
        assert!(insert.focus_due(second.ticket).is_some());

        insert.input("x^2");
        assert_eq!(insert.commit(&mut *editor), Ok(CommitOutcome::Committed));
        assert_eq!(editor.elements_of_type(FORMULA_TYPE).len(), 1);
    }

    #[test]
    fn test_opening_another_menu_closes_the_first() {
        let mut session = session();
        session.open_menu(INSERT_FORMULA_KEY).unwrap();
        {
            let EditorSession { editor, menus } = &mut session;
            let insert = menus.get_mut(INSERT_FORMULA_KEY).unwrap();
            insert.input("x^2");
            assert_eq!(insert.commit(&mut *editor), Ok(CommitOutcome::Committed));
        }
        caret_on_formula(&mut session);

        session.open_menu(EDIT_FORMULA_KEY).unwrap();
        assert!(session.menus[EDIT_FORMULA_KEY].is_open());

        // the caret is still on the formula, so insert is refused, but the
        // edit dialog is gone and the selection is back
        assert!(session.open_menu(INSERT_FORMULA_KEY).is_err());
        assert!(!session.menus[EDIT_FORMULA_KEY].is_open());
        assert!(!session.menus[INSERT_FORMULA_KEY].is_open());
        assert!(session.editor.selection().is_some());

        // and edit opens again from the restored selection
        let (key, _) = session.open_menu(EDIT_FORMULA_KEY).unwrap();
        assert_eq!(key, EDIT_FORMULA_KEY);
        assert!(session.menus[EDIT_FORMULA_KEY].is_open());
    }

    #[test]
    fn test_open_unknown_menu() {
        let mut session = session();
        assert!(session.open_menu("bold").is_err());
    }
}
