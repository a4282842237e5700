pub mod assemble;
pub mod batch;
pub mod constants;
mod io;
pub mod naming;
mod options;
pub mod overlay;
pub mod signature;
pub mod store;
mod template;
pub mod transform;
mod types;
pub mod validate;

pub use assemble::apply;
pub use batch::{
    compose, run_batch, run_batch_blocking, stamp_document, stamp_file, stamp_to_file,
    BatchItem, BatchProgress, BatchResult, CancellationToken, ChannelObserver, Outcome,
    ProgressObserver,
};
pub use io::{document_bytes, save_document, write_output};
pub use options::*;
pub use overlay::{build_overlay, OverlayLayer};
pub use signature::{encode_png, load_signature, resize};
pub use store::{load_recipients, PositionTemplate, PositionTemplateStore};
pub use template::{base_name_of, DocumentTemplate};
pub use transform::{document_box, to_document_space};
pub use types::*;
