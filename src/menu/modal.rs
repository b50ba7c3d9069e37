//! Modal dialog lifecycle for formula menus
//!
//! Each controller owns exactly one content container, built on first open
//! and cleared/repopulated on every later open. Opening and closing are the
//! only places the escape listener is attached and detached, so each
//! dismissal path removes it exactly once.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::{CommitOutcome, FormulaCommand, MenuError, ModalMenu};
use crate::editor::EditorHost;
use crate::formula::FormulaConfig;
use crate::models::{NodeKey, Path};
use crate::render::VNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalMode {
    Insert,
    Edit,
}

/// Transient state of one open dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalSession {
    pub mode: ModalMode,
    /// Node being edited; `None` when inserting
    pub target: Option<NodeKey>,
    pub pending_value: String,
    pub mounted: bool,
    generation: u64,
    escape_listener: ListenerId,
}

/// Focus to perform on the next event-loop turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusRequest {
    pub ticket: u64,
    pub element_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dismissal {
    Committed,
    Cancelled,
    Escape,
    Outside,
    Replaced,
}

pub type ListenerId = u64;

/// Page-level listeners owned by one controller
#[derive(Debug, Default)]
struct Listeners {
    next_id: ListenerId,
    active: BTreeSet<ListenerId>,
}

impl Listeners {
    fn attach(&mut self) -> ListenerId {
        self.next_id += 1;
        self.active.insert(self.next_id);
        self.next_id
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        self.active.remove(&id)
    }

    fn is_attached(&self, id: ListenerId) -> bool {
        self.active.contains(&id)
    }
}

/// Dialog body: a labelled textarea and a confirm button
#[derive(Debug, Clone)]
pub struct ModalContent {
    pub textarea_id: String,
    pub button_id: String,
    children: Vec<VNode>,
    value: String,
    populations: usize,
}

impl ModalContent {
    fn new(key: &str) -> Self {
        Self {
            textarea_id: gen_dom_id(key),
            button_id: gen_dom_id(key),
            children: Vec::new(),
            value: String::new(),
            populations: 0,
        }
    }

    fn populate(&mut self, config: &FormulaConfig, value: &str) {
        self.children.clear();
        self.value = value.to_string();

        let textarea = VNode {
            tag: "textarea".to_string(),
            text: Some(self.value.clone()),
            ..Default::default()
        }
        .prop("id", &self.textarea_id)
        .prop("placeholder", &config.textarea_placeholder);
        let label = VNode {
            tag: "span".to_string(),
            text: Some(config.textarea_label.clone()),
            ..Default::default()
        };
        self.children
            .push(VNode::new("label").class("babel-container").child(label).child(textarea));

        let button = VNode {
            tag: "button".to_string(),
            text: Some(config.confirm_label.clone()),
            ..Default::default()
        }
        .prop("id", &self.button_id)
        .prop("type", "button");
        self.children
            .push(VNode::new("div").class("button-container").child(button));

        self.populations += 1;
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        if let Some(textarea) = self
            .children
            .first_mut()
            .and_then(|label| label.children.iter_mut().find(|c| c.tag == "textarea"))
        {
            textarea.text = Some(value.to_string());
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// How many times the container has been (re)filled
    pub fn populations(&self) -> usize {
        self.populations
    }

    pub fn vnode(&self) -> VNode {
        VNode {
            tag: "div".to_string(),
            children: self.children.clone(),
            ..Default::default()
        }
    }
}

fn gen_dom_id(key: &str) -> String {
    format!("w-e-{}-{}", key, Uuid::new_v4().simple())
}

pub struct MenuController<C> {
    command: C,
    config: FormulaConfig,
    content: Option<ModalContent>,
    session: Option<ModalSession>,
    generation: u64,
    listeners: Listeners,
}

impl<C: FormulaCommand> MenuController<C> {
    pub fn new(command: C, config: FormulaConfig) -> Self {
        Self {
            command,
            config,
            content: None,
            session: None,
            generation: 0,
            listeners: Listeners::default(),
        }
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    pub fn modal_content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    /// Listeners still attached to the page
    pub fn active_listeners(&self) -> usize {
        self.listeners.active.len()
    }

    fn close(&mut self, reason: Dismissal) {
        if let Some(session) = self.session.take() {
            self.listeners.detach(session.escape_listener);
            log::debug!("{} dialog closed: {:?}", self.command.key(), reason);
        }
    }
}

impl<C: FormulaCommand> ModalMenu for MenuController<C> {
    fn key(&self) -> &'static str {
        self.command.key()
    }

    fn title(&self) -> &str {
        self.command.title()
    }

    fn icon_svg(&self) -> &'static str {
        self.command.icon_svg()
    }

    fn modal_width(&self) -> u32 {
        self.config.modal_width
    }

    fn is_disabled(&self, host: &dyn EditorHost) -> bool {
        self.command.is_disabled(host)
    }

    fn get_value(&self, host: &dyn EditorHost) -> String {
        self.command.get_value(host)
    }

    fn modal_position_node(&self, host: &dyn EditorHost) -> Option<Path> {
        self.command.modal_position_node(host).map(|(path, _)| path)
    }

    fn open(&mut self, host: &dyn EditorHost) -> Result<FocusRequest, MenuError> {
        // one dialog per controller: tear down any previous one first
        self.close(Dismissal::Replaced);

        if self.command.is_disabled(host) {
            return Err(MenuError::Disabled(self.command.key()));
        }

        let value = self.command.get_value(host);
        let target = self
            .command
            .modal_position_node(host)
            .map(|(_, element)| element.key);

        let key = self.command.key();
        let content = self.content.get_or_insert_with(|| ModalContent::new(key));
        content.populate(&self.config, &value);
        let element_id = content.textarea_id.clone();

        self.generation += 1;
        let escape_listener = self.listeners.attach();
        self.session = Some(ModalSession {
            mode: self.command.mode(),
            target,
            pending_value: value,
            mounted: true,
            generation: self.generation,
            escape_listener,
        });

        Ok(FocusRequest {
            ticket: self.generation,
            element_id,
        })
    }

    fn input(&mut self, value: &str) {
        if let Some(session) = self.session.as_mut() {
            session.pending_value = value.to_string();
            if let Some(content) = self.content.as_mut() {
                content.set_value(value);
            }
        }
    }

    fn commit(&mut self, host: &mut dyn EditorHost) -> Result<CommitOutcome, MenuError> {
        let Some(session) = &self.session else {
            return Ok(CommitOutcome::NotOpen);
        };
        let value = session.pending_value.trim().to_string();
        let target = session.target;
        if value.is_empty() {
            return Ok(CommitOutcome::EmptyInput);
        }

        // dialog focus took the selection away from the editor
        host.restore_selection();
        if self.command.is_disabled(&*host) {
            log::debug!("{}: selection went stale, commit skipped", self.command.key());
            self.close(Dismissal::Committed);
            return Ok(CommitOutcome::Stale);
        }

        let applied = self.command.commit(host, &value, target);
        self.close(Dismissal::Committed);

        match applied? {
            true => Ok(CommitOutcome::Committed),
            false => {
                log::debug!("{}: target gone, commit skipped", self.command.key());
                Ok(CommitOutcome::Stale)
            }
        }
    }

    fn cancel(&mut self) {
        self.close(Dismissal::Cancelled);
    }

    fn dismiss(&mut self) {
        self.close(Dismissal::Outside);
    }

    fn handle_key(&mut self, key: &str) -> bool {
        let listening = self
            .session
            .as_ref()
            .is_some_and(|s| self.listeners.is_attached(s.escape_listener));
        if listening && key == "Escape" {
            self.close(Dismissal::Escape);
            return true;
        }
        false
    }

    fn focus_due(&self, ticket: u64) -> Option<&str> {
        match (&self.session, &self.content) {
            (Some(session), Some(content)) if session.mounted && session.generation == ticket => {
                Some(content.textarea_id.as_str())
            }
            _ => None,
        }
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn content(&self) -> Option<VNode> {
        self.session.as_ref()?;
        self.content.as_ref().map(ModalContent::vnode)
    }
}
