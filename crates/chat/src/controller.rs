use natter_storage::{KeyValueStore, StoreKeys};
use rand::Rng;

use crate::composer::{Composer, ComposerAction, KeyCode, WarningUpdate};
use crate::config::ChatConfig;
use crate::event::{ChatEvent, EventResponse};
use crate::identity::Identity;
use crate::ids::IdGenerator;
use crate::outbound::{OutboundPipeline, SubmitOutcome};
use crate::session::Session;
use crate::surfaces::ChatSurfaces;
use crate::transport::Transport;
use crate::visibility::Visibility;

/// Owns one chat session and routes host events through it.
///
/// Every collaborator is injected: `S` persists identity and visibility,
/// `T` carries outbound frames, `U` is the UI, `G` mints message ids.
pub struct ChatSessionController<S, T, U, G> {
    keys: StoreKeys,
    compact_viewport: bool,
    store: S,
    surfaces: U,
    session: Session,
    pipeline: OutboundPipeline<T, G>,
}

impl<S, T, U, G> ChatSessionController<S, T, U, G>
where
    S: KeyValueStore,
    T: Transport,
    U: ChatSurfaces,
    G: IdGenerator,
{
    /// Loads identity and visibility from `store` and paints the surfaces.
    pub fn start<R>(
        config: ChatConfig,
        store: S,
        transport: T,
        mut surfaces: U,
        ids: G,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let config = config.normalized();
        let keys = config.store_keys();

        let identity = Identity::load(&store, &keys.username, &config.avatar_base_url, rng);
        identity.apply(&mut surfaces);
        surfaces.show_identity_view(identity.view());

        let visibility = Visibility::load(&store, &keys.chat_visible);
        visibility.apply(&mut surfaces);

        tracing::info!(
            username = identity.username(),
            chat_visible = visibility.is_visible(),
            "chat session started"
        );

        Self {
            keys,
            compact_viewport: config.compact_viewport,
            store,
            surfaces,
            session: Session {
                identity,
                visibility,
                composer: Composer::new(config.composer_limits()),
            },
            pipeline: OutboundPipeline::new(transport, ids),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn surfaces(&self) -> &U {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut U {
        &mut self.surfaces
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        self.pipeline.transport()
    }

    pub fn handle(&mut self, event: ChatEvent) -> EventResponse {
        tracing::trace!(?event, "chat event");
        match event {
            ChatEvent::ToggleChat => {
                self.toggle_chat();
                EventResponse::allow()
            }
            ChatEvent::ShowNameForm => {
                self.begin_name_edit();
                EventResponse::allow()
            }
            ChatEvent::CancelNameForm => {
                self.cancel_name_edit();
                EventResponse::allow()
            }
            ChatEvent::CommitName => {
                self.commit_name_from_input();
                EventResponse::allow()
            }
            ChatEvent::UsernameKeyDown(key) => self.handle_username_key(key),
            ChatEvent::ComposerKeyDown(key) => self.handle_composer_key(key),
            ChatEvent::SubmitClicked => self.submit_clicked(),
            ChatEvent::ComposerFocus => {
                self.set_composer_focus(true);
                EventResponse::allow()
            }
            ChatEvent::ComposerBlur => {
                self.set_composer_focus(false);
                EventResponse::allow()
            }
        }
    }

    pub fn toggle_chat(&mut self) -> bool {
        self.session
            .visibility
            .toggle(&self.store, &self.keys.chat_visible, &mut self.surfaces)
    }

    pub fn begin_name_edit(&mut self) {
        self.session.identity.begin_edit(&mut self.surfaces);
    }

    pub fn cancel_name_edit(&mut self) {
        self.session.identity.cancel_edit(&mut self.surfaces);
    }

    pub fn commit_name(&mut self, raw: &str) -> bool {
        self.session.identity.commit_edit(
            raw,
            &self.store,
            &self.keys.username,
            &mut self.surfaces,
        )
    }

    pub fn commit_name_from_input(&mut self) -> bool {
        let raw = self.surfaces.username_input();
        self.commit_name(&raw)
    }

    /// Enter commits the rename form, Escape closes it.
    pub fn handle_username_key(&mut self, key: KeyCode) -> EventResponse {
        if key == KeyCode::ENTER {
            self.commit_name_from_input();
        } else if key == KeyCode::ESCAPE {
            self.cancel_name_edit();
        }
        EventResponse::allow()
    }

    pub fn handle_composer_key(&mut self, key: KeyCode) -> EventResponse {
        let value = self.surfaces.composer_value();
        let decision = self.session.composer.handle_keydown(key, &value);

        match &decision.warning {
            WarningUpdate::Show(text) => self.surfaces.set_warning(text),
            WarningUpdate::Clear => self.surfaces.set_warning(""),
            WarningUpdate::Unchanged => {}
        }

        let response = if decision.prevent_default {
            EventResponse::prevent()
        } else {
            EventResponse::allow()
        };

        match decision.action {
            ComposerAction::Submit(text) => response.with_submission(self.submit(&text)),
            ComposerAction::Continue => response,
        }
    }

    /// Submit button: same pipeline as Enter, and the click's default
    /// action is always suppressed.
    pub fn submit_clicked(&mut self) -> EventResponse {
        let value = self.surfaces.composer_value();
        EventResponse::prevent().with_submission(self.submit(&value))
    }

    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        self.pipeline
            .submit(raw, &self.session.identity, &mut self.surfaces)
    }

    fn set_composer_focus(&mut self, focused: bool) {
        if self.compact_viewport {
            self.surfaces.set_keyboard_focus(focused);
        }
    }
}

#[cfg(test)]
mod tests {
    use natter_storage::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::composer::ComposerState;
    use crate::identity::IdentityView;
    use crate::outbound::SEND_FAILED_WARNING;
    use crate::test_support::{RecordingSurfaces, RecordingTransport, SequentialIds};
    use crate::wire::OutboundMessage;

    type TestController<'a> = ChatSessionController<
        &'a MemoryStore,
        &'a RecordingTransport,
        RecordingSurfaces,
        SequentialIds,
    >;

    fn start<'a>(
        store: &'a MemoryStore,
        transport: &'a RecordingTransport,
        config: ChatConfig,
    ) -> TestController<'a> {
        ChatSessionController::start(
            config,
            store,
            transport,
            RecordingSurfaces::default(),
            SequentialIds::default(),
            &mut StdRng::seed_from_u64(11),
        )
    }

    fn type_text(controller: &mut TestController<'_>, text: &str) {
        for character in text.chars() {
            let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::for_char(character)));
            if !response.prevent_default {
                controller.surfaces_mut().composer.push(character);
            }
        }
    }

    fn sent_messages(transport: &RecordingTransport) -> Vec<OutboundMessage> {
        transport
            .frames()
            .iter()
            .map(|frame| OutboundMessage::from_json(frame).unwrap())
            .collect()
    }

    #[test]
    fn fresh_store_generates_name_without_persisting_it() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let controller = start(&store, &transport, ChatConfig::default());

        let username = controller.session().username().to_string();
        let suffix: u32 = username.strip_prefix("User").unwrap().parse().unwrap();
        assert!((1..=42).contains(&suffix));

        let surfaces = controller.surfaces();
        assert_eq!(surfaces.username_label, username);
        assert_eq!(surfaces.username_input, username);
        assert_eq!(surfaces.message_author, username);
        assert_eq!(surfaces.avatar, format!("https://robohash.org/{username}"));
        assert_eq!(surfaces.identity_view, IdentityView::Display);
        assert_eq!(surfaces.chat_visible, Some(false));
        assert_eq!(store.get("natter_username").unwrap(), None);
    }

    #[test]
    fn persisted_state_is_restored_under_app_namespace() {
        let store = MemoryStore::with_entries([
            ("owncast_username", "Alice"),
            ("owncast_chat", "true"),
        ]);
        let transport = RecordingTransport::default();
        let config = ChatConfig {
            app_name: "owncast".to_string(),
            ..ChatConfig::default()
        };
        let controller = start(&store, &transport, config);

        assert_eq!(controller.session().username(), "Alice");
        assert!(controller.session().chat_visible());
        assert_eq!(controller.surfaces().chat_visible, Some(true));
    }

    #[test]
    fn rename_through_form_persists_trimmed_name() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.handle(ChatEvent::ShowNameForm);
        assert_eq!(controller.session().identity_view(), IdentityView::Editing);

        controller.surfaces_mut().username_input = "  Alice  ".to_string();
        controller.handle(ChatEvent::CommitName);

        assert_eq!(controller.session().username(), "Alice");
        assert_eq!(store.get("natter_username").unwrap().as_deref(), Some("Alice"));
        assert_eq!(controller.surfaces().identity_view, IdentityView::Display);
        assert_eq!(controller.surfaces().message_author, "Alice");
    }

    #[test]
    fn blank_rename_leaves_name_and_store_alone() {
        let store = MemoryStore::with_entries([("natter_username", "Alice")]);
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.begin_name_edit();
        assert!(!controller.commit_name("   "));

        assert_eq!(controller.session().username(), "Alice");
        assert_eq!(controller.session().identity_view(), IdentityView::Display);
        assert_eq!(store.get("natter_username").unwrap().as_deref(), Some("Alice"));
    }

    #[test]
    fn username_field_keys_commit_and_cancel() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.handle(ChatEvent::ShowNameForm);
        controller.surfaces_mut().username_input = "Bob".to_string();
        let response = controller.handle(ChatEvent::UsernameKeyDown(KeyCode::ESCAPE));
        assert!(!response.prevent_default);
        assert_eq!(controller.session().identity_view(), IdentityView::Display);
        assert_ne!(controller.session().username(), "Bob");

        controller.handle(ChatEvent::ShowNameForm);
        controller.handle(ChatEvent::UsernameKeyDown(KeyCode::for_char('b')));
        assert_eq!(controller.session().identity_view(), IdentityView::Editing);

        controller.handle(ChatEvent::UsernameKeyDown(KeyCode::ENTER));
        assert_eq!(controller.session().username(), "Bob");
        assert_eq!(controller.session().identity_view(), IdentityView::Display);
    }

    #[test]
    fn toggling_visibility_round_trips_through_store() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.handle(ChatEvent::ToggleChat);
        assert_eq!(store.get("natter_chat").unwrap().as_deref(), Some("true"));

        controller.handle(ChatEvent::ToggleChat);
        assert_eq!(store.get("natter_chat").unwrap(), None);
        assert_eq!(controller.surfaces().chat_visible, Some(false));
    }

    #[test]
    fn enter_submits_composer_text() {
        let store = MemoryStore::with_entries([("natter_username", "Alice")]);
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        type_text(&mut controller, "hello");
        let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));

        assert!(response.prevent_default);
        assert!(matches!(response.submitted, Some(SubmitOutcome::Sent(_))));
        let sent = sent_messages(&transport);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "hello");
        assert_eq!(sent[0].author, "Alice");
        assert_eq!(controller.surfaces().composer, "");
    }

    #[test]
    fn shift_enter_inserts_newline_instead_of_submitting() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());
        controller.surfaces_mut().composer = "hello".to_string();

        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::SHIFT));
        let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));

        assert!(!response.prevent_default);
        assert!(response.submitted.is_none());
        assert!(transport.frames().is_empty());
        assert_eq!(controller.session().composer_state(), ComposerState::Idle);
    }

    #[test]
    fn multi_line_message_keeps_inner_newline() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        type_text(&mut controller, "line one");
        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::CTRL));
        if !controller
            .handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER))
            .prevent_default
        {
            controller.surfaces_mut().composer.push('\n');
        }
        type_text(&mut controller, "line two");
        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));

        assert_eq!(sent_messages(&transport)[0].body, "line one\nline two");
    }

    #[test]
    fn enter_on_blank_composer_sends_nothing() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());
        controller.surfaces_mut().composer = "   ".to_string();

        let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));

        assert!(response.prevent_default);
        assert!(matches!(response.submitted, Some(SubmitOutcome::Skipped)));
        assert!(transport.frames().is_empty());
        assert_eq!(controller.surfaces().composer, "   ");
    }

    #[test]
    fn typing_stops_at_the_limit() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        type_text(&mut controller, &"a".repeat(520));

        assert_eq!(controller.surfaces().composer.chars().count(), 500);
        assert_eq!(controller.surfaces().warning, "0 chars left");

        let backspace = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::BACKSPACE));
        assert!(!backspace.prevent_default);
    }

    #[test]
    fn warning_tracks_remaining_characters() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());
        controller.surfaces_mut().composer = "a".repeat(481);

        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::for_char('a')));
        assert_eq!(controller.surfaces().warning, "19 chars left");

        controller.surfaces_mut().composer = "a".repeat(10);
        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::for_char('a')));
        assert_eq!(controller.surfaces().warning, "");
    }

    #[test]
    fn submit_button_uses_the_same_pipeline() {
        let store = MemoryStore::with_entries([("natter_username", "Alice")]);
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.surfaces_mut().composer = "   ".to_string();
        let blank = controller.handle(ChatEvent::SubmitClicked);
        assert!(blank.prevent_default);
        assert!(transport.frames().is_empty());

        controller.surfaces_mut().composer = "  via button ".to_string();
        let clicked = controller.handle(ChatEvent::SubmitClicked);
        assert!(clicked.prevent_default);
        assert_eq!(sent_messages(&transport)[0].body, "via button");
        assert_eq!(controller.surfaces().composer, "");
    }

    #[test]
    fn submission_uses_name_at_send_time() {
        let store = MemoryStore::with_entries([("natter_username", "Alice")]);
        let transport = RecordingTransport::default();
        let mut controller = start(&store, &transport, ChatConfig::default());

        controller.submit("first");
        controller.commit_name("Carol");
        controller.submit("second");

        let authors = sent_messages(&transport)
            .into_iter()
            .map(|message| message.author)
            .collect::<Vec<_>>();
        assert_eq!(authors, ["Alice", "Carol"]);
    }

    #[test]
    fn send_failure_is_reported_and_text_kept() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::failing();
        let mut controller = start(&store, &transport, ChatConfig::default());
        controller.surfaces_mut().composer = "hello".to_string();

        let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));

        assert!(matches!(response.submitted, Some(SubmitOutcome::Failed(_))));
        assert_eq!(controller.surfaces().composer, "hello");
        assert_eq!(controller.surfaces().warning, SEND_FAILED_WARNING);
    }

    #[test]
    fn focus_tracking_follows_compact_viewport_flag() {
        let store = MemoryStore::new();
        let transport = RecordingTransport::default();

        let mut regular = start(&store, &transport, ChatConfig::default());
        regular.handle(ChatEvent::ComposerFocus);
        assert_eq!(regular.surfaces().keyboard_focus, None);

        let config = ChatConfig {
            compact_viewport: true,
            ..ChatConfig::default()
        };
        let mut compact = start(&store, &transport, config);
        compact.handle(ChatEvent::ComposerFocus);
        assert_eq!(compact.surfaces().keyboard_focus, Some(true));
        compact.handle(ChatEvent::ComposerBlur);
        assert_eq!(compact.surfaces().keyboard_focus, Some(false));
    }
}
