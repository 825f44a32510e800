use tracing::debug;

use crate::{
    actions::{
        action_model::{ActionRequest, decode_action_batch},
        dispatcher::{DispatchOutcome, execute_actions},
        preview::{DEFAULT_PREVIEW_MARGIN, PreviewAnnotation, build_previews},
    },
    context::messages::{ContentMessage, ContentResponse},
    dom::dom_model::DocumentHost,
    extract::{
        extraction_model::{ExtractionOptions, ExtractionResult},
        identifier_map::IdentifierMap,
        tree_builder::parse_nodes,
    },
    selection::selector::{SelectionEvent, SelectionState},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Everything one page owns: the document, the user's selection, and the
/// identifier map of the latest extraction pass.
///
/// Each context is independent, so identifiers from one page never resolve
/// against another.
pub struct ExtractionContext<H: DocumentHost> {
    host: H,
    selection: SelectionState<H::NodeRef>,
    identifiers: IdentifierMap<H::NodeRef>,
    previews: Vec<PreviewAnnotation>,
    overlay: Option<String>,
    options: ExtractionOptions,
    preview_margin: f64,
    tracer: TraceLogger,
    pass: u64,
}

impl<H: DocumentHost> ExtractionContext<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            selection: SelectionState::new(),
            identifiers: IdentifierMap::new(),
            previews: Vec::new(),
            overlay: None,
            options: ExtractionOptions::default(),
            preview_margin: DEFAULT_PREVIEW_MARGIN,
            tracer: TraceLogger::disabled(),
            pass: 0,
        }
    }

    pub fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_preview_margin(mut self, margin: f64) -> Self {
        self.preview_margin = margin;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn selection(&self) -> &SelectionState<H::NodeRef> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState<H::NodeRef> {
        &mut self.selection
    }

    pub fn identifiers(&self) -> &IdentifierMap<H::NodeRef> {
        &self.identifiers
    }

    pub fn previews(&self) -> &[PreviewAnnotation] {
        &self.previews
    }

    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Number of extraction passes run so far.
    pub fn passes(&self) -> u64 {
        self.pass
    }

    /// Extract the current selection. Returns `None` when nothing is
    /// selected, in which case the previous identifier map is kept.
    pub fn extract_selection(&mut self) -> Option<Vec<ExtractionResult>> {
        let roots = self.selection.roots(self.host.body())?;
        if roots.is_empty() {
            return None;
        }
        Some(self.extract(&roots))
    }

    /// Run a pass over explicit roots, replacing the identifier map.
    pub fn extract(&mut self, roots: &[H::NodeRef]) -> Vec<ExtractionResult> {
        let (results, identifiers) = parse_nodes(&self.host, roots, &self.options);
        self.identifiers = identifiers;
        self.pass += 1;

        self.tracer.log(
            &TraceEvent::now(self.pass, "extract")
                .with_extraction(&results, self.identifiers.len()),
        );
        results
    }

    pub fn execute(&mut self, requests: &[ActionRequest]) -> Vec<DispatchOutcome> {
        let outcomes = execute_actions(&mut self.host, &self.identifiers, requests);
        for (request, outcome) in requests.iter().zip(&outcomes) {
            self.tracer.log(
                &TraceEvent::now(self.pass, "dispatch")
                    .with_action(&request.action)
                    .with_outcome(outcome),
            );
        }
        outcomes
    }

    /// Replace the current annotations with previews of `requests`.
    pub fn show_previews(&mut self, requests: &[ActionRequest]) -> Vec<PreviewAnnotation> {
        self.previews = build_previews(&self.host, &self.identifiers, requests, self.preview_margin);
        for request in requests {
            self.tracer
                .log(&TraceEvent::now(self.pass, "preview").with_action(&request.action));
        }
        self.previews.clone()
    }

    pub fn clear_previews(&mut self) {
        self.previews.clear();
    }

    pub fn show_overlay(&mut self, content: &str) {
        self.overlay = Some(content.to_string());
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // ---- Page events while selecting ----

    pub fn on_pointer_move(&mut self, node: H::NodeRef) {
        self.selection.hover(node);
    }

    /// Returns true when the click was captured by selection mode.
    pub fn on_click(&mut self, node: H::NodeRef) -> bool {
        self.selection.toggle(node)
    }

    pub fn on_escape(&mut self) -> Option<SelectionEvent> {
        self.selection.escape()
    }

    /// Handle one transport message.
    pub fn handle(&mut self, message: ContentMessage) -> Option<ContentResponse> {
        debug!(?message, "content message");

        match message {
            ContentMessage::ShowContextOverlay { content } => {
                self.show_overlay(&content);
                None
            }
            ContentMessage::StartSelection => {
                self.selection.start();
                None
            }
            ContentMessage::StopSelection => {
                self.selection.stop();
                None
            }
            ContentMessage::ClearSelection => {
                self.selection.clear_selections();
                None
            }
            ContentMessage::ParseEntirePage => {
                self.selection.parse_entire_page();
                None
            }
            ContentMessage::GetSelectedContent => {
                self.extract_selection().map(ContentResponse::Extraction)
            }
            ContentMessage::ExecuteActions { actions } => {
                let requests = decode_action_batch(&actions);
                Some(ContentResponse::Dispatched(self.execute(&requests)))
            }
            ContentMessage::ShowActionPreviews { actions } => {
                let requests = decode_action_batch(&actions);
                Some(ContentResponse::Previews(self.show_previews(&requests)))
            }
            ContentMessage::ClearActionPreviews => {
                self.clear_previews();
                None
            }
        }
    }
}
