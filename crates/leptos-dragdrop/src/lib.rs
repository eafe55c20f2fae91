//! Leptos DragDrop Utilities
//!
//! Row-onto-row drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag. What a drop
//! means is left to the caller: it receives `(dragged_id, target_id)`.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Anything usable as a row key
pub trait DragId: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> DragId for T {}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// How long clicks are swallowed after a drop, in milliseconds
const CLICK_SUPPRESS_MS: i32 = 100;

/// DnD state signals
pub struct DndSignals<Id: DragId> {
    pub dragging_id_read: ReadSignal<Option<Id>>,
    pub dragging_id_write: WriteSignal<Option<Id>>,
    /// Row currently hovered while dragging
    pub over_id_read: ReadSignal<Option<Id>>,
    pub over_id_write: WriteSignal<Option<Id>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending row id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<Id>>,
    pub pending_id_write: WriteSignal<Option<Id>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

// Signals are arena handles, so the struct is Copy whatever `Id` is
impl<Id: DragId> Clone for DndSignals<Id> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id: DragId> Copy for DndSignals<Id> {}

impl<Id: DragId> DndSignals<Id> {
    pub fn is_dragging(&self, id: &Id) -> bool {
        self.dragging_id_read.with(|d| d.as_ref() == Some(id))
    }

    pub fn is_over(&self, id: &Id) -> bool {
        self.over_id_read.with(|o| o.as_ref() == Some(id))
    }

    pub fn is_active(&self) -> bool {
        self.dragging_id_read.with(Option::is_some)
    }
}

pub fn create_dnd_signals<Id: DragId>() -> DndSignals<Id> {
    let (dragging_id_read, dragging_id_write) = signal(None::<Id>);
    let (over_id_read, over_id_write) = signal(None::<Id>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<Id>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        over_id_read,
        over_id_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
    }
}

/// True once the pointer has travelled far enough to count as a drag
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    (current.0 - start.0).abs() > DRAG_THRESHOLD_PX || (current.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// What a finished gesture amounts to: `Some((dragged, target))` only for a
/// real drag released over a different row.
pub fn drop_pair<Id: DragId>(dragging: Option<Id>, over: Option<Id>) -> Option<(Id, Id)> {
    match (dragging, over) {
        (Some(dragged), Some(target)) if dragged != target => Some((dragged, target)),
        _ => None,
    }
}

/// End drag operation
pub fn end_drag<Id: DragId>(dnd: &DndSignals<Id>) {
    let was_dragging = dnd.dragging_id_read.with_untracked(Option::is_some);
    dnd.dragging_id_write.set(None);
    dnd.over_id_write.set(None);
    dnd.pending_id_write.set(None);
    if !was_dragging {
        return;
    }

    dnd.drag_just_ended_write.set(true);
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            CLICK_SUPPRESS_MS,
        );
        cb.forget();
    }
}

/// Create mousedown handler for draggable rows.
/// Records a pending drag with its start position.
pub fn make_on_mousedown<Id: DragId>(
    dnd: DndSignals<Id>,
    item_id: Id,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Controls inside the row keep their own click behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() {
                return;
            }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() {
                return;
            }
        }
        dnd.pending_id_write.set(Some(item_id.clone()));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Document mousemove: promotes a pending drag once past the threshold
fn bind_global_mousemove<Id: DragId>(dnd: DndSignals<Id>) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            return;
        }
        let Some(pending) = dnd.pending_id_read.get_untracked() else {
            return;
        };
        if exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y())) {
            dnd.dragging_id_write.set(Some(pending));
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for rows
pub fn make_on_mouseenter<Id: DragId>(
    dnd: DndSignals<Id>,
    item_id: Id,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging_id_read.get_untracked() else {
            return;
        };
        // Don't allow dropping on self
        if dragging != item_id {
            dnd.over_id_write.set(Some(item_id.clone()));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<Id: DragId>(dnd: DndSignals<Id>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            dnd.over_id_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection.
///
/// `on_drop` fires with `(dragged_id, target_id)` for real drags released over
/// another row; plain clicks fall through untouched.
pub fn bind_global_mouseup<Id, F>(dnd: DndSignals<Id>, on_drop: F)
where
    Id: DragId,
    F: Fn(Id, Id) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let pair = drop_pair(dnd.dragging_id_read.get_untracked(), dnd.over_id_read.get_untracked());
        end_drag(&dnd);
        if let Some((dragged, target)) = pair {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
