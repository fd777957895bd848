// This file is part of the terraform-provider-lidarr project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::borrow::Cow;

use tf_provider::Diagnostics;

/// Report `err` as a root error, the detail holding the whole chain of causes
pub(crate) fn report_error<S, E>(diags: &mut Diagnostics, summary: S, err: E)
where
    S: Into<Cow<'static, str>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let summary = summary.into();
    let err = anyhow::Error::from(err);
    tracing::error!("{summary}: {err:#}");
    diags.root_error(summary, format!("{err:#}"));
}

/// Parse the numeric identifier given to `terraform import`
pub(crate) fn parse_import_id(diags: &mut Diagnostics, id: &str) -> Option<i64> {
    match id.trim().parse() {
        Ok(id) => Some(id),
        Err(err) => {
            diags.root_error(
                "Invalid import identifier",
                format!("Expected the numeric Lidarr id, got `{id}`: {err}"),
            );
            None
        }
    }
}
