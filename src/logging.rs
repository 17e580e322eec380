// Copyright (c) 2026 goobj-reader Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
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

/// Logger setup for the command line tool.
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Level used when neither `--debug` nor `RUST_LOG` says otherwise.
pub const DEFAULT_LEVEL: &str = "warn";

pub fn level_for(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        DEFAULT_LEVEL
    }
}

/// Start logging to stderr. `RUST_LOG` overrides the level picked from the
/// debug flag. Keep the returned handle alive for the life of the program.
pub fn init_logging(debug: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(level_for(debug))?
        .log_to_stderr()
        .start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_level() {
        assert_eq!(level_for(true), "debug");
        assert_eq!(level_for(false), "warn");
    }
}
