use tracing::{debug, debug_span};

use tag_core::{filter_candidates, find_trigger_span, Candidate, TriggerSpan};

use super::types::{
    cyclic_index, ActiveToken, CandidateAction, DismissedToken, SessionEvent, SessionResponse,
    SessionState,
};
use super::AutocompleteSession;

impl AutocompleteSession {
    /// Adopt the host's newest document/selection and re-derive the token.
    pub fn handle_event(&mut self, event: SessionEvent) -> SessionResponse {
        let _span = debug_span!("handle_event", event = event.name()).entered();

        match event {
            SessionEvent::DocumentChanged {
                document,
                selection,
            } => {
                self.document = document;
                self.selection = selection;
            }
            SessionEvent::SelectionChanged(selection) => {
                self.selection = selection;
            }
        }
        self.refresh()
    }

    /// Replace the candidate list and refilter the active token.
    pub fn set_candidates(&mut self, candidates: impl Into<std::sync::Arc<[Candidate]>>) -> SessionResponse {
        self.candidates = candidates.into();
        self.refresh()
    }

    /// Move the highlight by `delta`, wrapping at both ends.
    pub fn move_selection(&mut self, delta: i32) -> SessionResponse {
        let SessionState::TokenActive(token) = &mut self.state else {
            return self.response(CandidateAction::Keep);
        };
        if token.matches.is_empty() {
            return self.response(CandidateAction::Keep);
        }
        token.selected = cyclic_index(token.selected, delta, token.matches.len());
        let action = CandidateAction::show(&token.matches, token.selected);
        self.response(action)
    }

    /// Close the dropdown for the current token. It stays closed while the
    /// token is only extended, and reopens once the caret leaves it, its
    /// text is rewritten or a different trigger is typed.
    pub fn dismiss(&mut self) -> SessionResponse {
        let SessionState::TokenActive(token) = &self.state else {
            return self.response(CandidateAction::Keep);
        };
        let was_showing = !token.matches.is_empty();
        self.dismissed = Some(DismissedToken {
            block: token.span.block.clone(),
            anchor: token.span.anchor,
            query: token.query.clone(),
        });
        self.state = SessionState::Idle;
        debug!("dismissed");
        self.response(if was_showing {
            CandidateAction::Hide
        } else {
            CandidateAction::Keep
        })
    }

    /// Trigger span at the caret, unless its trigger char belongs to an
    /// existing entity.
    pub(super) fn derive_span(&self) -> Option<TriggerSpan> {
        let span = find_trigger_span(&self.document, &self.selection, self.config.trigger)?;
        let block = self.document.block(&span.block)?;
        if block.range_at(span.anchor).is_some() {
            return None;
        }
        Some(span)
    }

    pub(super) fn refresh(&mut self) -> SessionResponse {
        let was_showing = self.is_showing();
        let span = self.derive_span();

        if let Some(dismissed) = &self.dismissed {
            let same_token = span
                .as_ref()
                .is_some_and(|s| dismissed.covers(s, s.query(&self.document)));
            if same_token {
                self.state = SessionState::Idle;
                return self.response(CandidateAction::Keep);
            }
            self.dismissed = None;
        }

        let Some(span) = span else {
            self.state = SessionState::Idle;
            return self.response(hide_if(was_showing));
        };
        let Some(query) = span.query(&self.document).map(str::to_string) else {
            self.state = SessionState::Idle;
            return self.response(hide_if(was_showing));
        };

        let matches: Vec<Candidate> =
            filter_candidates(&self.candidates, Some(&query), &self.config.filter_options())
                .into_iter()
                .cloned()
                .collect();

        // Keep the highlight while the same token is being refined
        let selected = match &self.state {
            SessionState::TokenActive(prev)
                if prev.span.block == span.block && prev.span.anchor == span.anchor =>
            {
                let prev_value = prev.matches.get(prev.selected).map(|c| &c.value);
                matches
                    .iter()
                    .position(|c| Some(&c.value) == prev_value)
                    .unwrap_or(0)
            }
            _ => 0,
        };
        debug!(query = %query, matches = matches.len(), selected, "token active");

        let action = if matches.is_empty() {
            hide_if(was_showing)
        } else {
            CandidateAction::show(&matches, selected)
        };
        self.state = SessionState::TokenActive(ActiveToken {
            span,
            query,
            matches,
            selected,
        });
        self.response(action)
    }

    fn is_showing(&self) -> bool {
        matches!(&self.state, SessionState::TokenActive(t) if !t.matches.is_empty())
    }

    fn response(&self, candidates: CandidateAction) -> SessionResponse {
        SessionResponse {
            candidates,
            query: self.query().map(str::to_string),
        }
    }
}

fn hide_if(was_showing: bool) -> CandidateAction {
    if was_showing {
        CandidateAction::Hide
    } else {
        CandidateAction::Keep
    }
}
