use crate::options::ToastPatch;
use crate::state::TimerKey;
use showme_config::ConfigPatch;
use showme_util::ToastId;

/// Engine message types
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Countdown fired
    Timeout { id: ToastId, key: TimerKey },
    /// Close control pressed
    Dismissed(ToastId),
    /// Closed through a handle
    Close(ToastId),
    /// Toast body clicked
    Clicked(ToastId),
    /// Action button clicked (toast id, action index)
    ActionClicked(ToastId, usize),
    /// Pointer or touch went down at `x`
    GestureStart { id: ToastId, x: f32 },
    /// Pointer or touch released at `x`
    GestureEnd { id: ToastId, x: f32 },
    /// Host asks to hold the countdown (hover, focus, etc.)
    Suspend(ToastId),
    Resume(ToastId),
    /// Presenter finished the exit transition
    ExitFinished(ToastId),
    /// Change a live toast in place
    Update(ToastId, ToastPatch),
    /// Merge into the defaults used by later toasts
    Config(ConfigPatch),
}
