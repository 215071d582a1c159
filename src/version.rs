// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Lost & Found AI service

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-hybrid-classification-2025-10-13";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-13";

/// Human-readable service name
pub const SERVICE_NAME: &str = "Lost & Found AI Service";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {} ({})", SERVICE_NAME, VERSION_NUMBER, BUILD_DATE)
}
