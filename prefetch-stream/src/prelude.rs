// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Convenient imports: `use prefetch_stream::prelude::*;`

pub use crate::into_stream_items::{IntoStreamItems, TryIntoStreamItems};
pub use crate::prefetch::Prefetch;
pub use crate::prefetch_ext::PrefetchExt;
pub use prefetch_core::{PrefetchError, StreamItem};
