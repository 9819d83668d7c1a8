// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use polystore_type::TypeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
	#[error("expression '{0}' is not constant")]
	NotConstant(String),

	#[error(transparent)]
	Type(#[from] TypeError),
}

pub type Result<T> = std::result::Result<T, PlanError>;
