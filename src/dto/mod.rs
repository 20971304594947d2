pub mod codes;

pub use codes::{
    BindRequest, BindResponse, CodesDocument, DeleteBindingRequest, DeleteBindingResponse,
};
