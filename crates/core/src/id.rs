// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

macro_rules! define_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[repr(transparent)]
		#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub u64);

		impl Deref for $name {
			type Target = u64;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}

		impl PartialEq<u64> for $name {
			fn eq(&self, other: &u64) -> bool {
				self.0.eq(other)
			}
		}

		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				Display::fmt(&self.0, f)
			}
		}
	};
}

define_id!(
	/// Identifies one transaction for its whole lifetime, including the lock
	/// scope it owns.
	TransactionId
);

define_id!(
	/// Monotonic per transaction; distinguishes statements of the same
	/// transaction in change-data-capture records.
	StatementId
);

define_id!(NamespaceId);
define_id!(CollectionId);
define_id!(TableId);
define_id!(PartitionId);
define_id!(ColumnId);

define_id!(
	/// Binds the variables a correlated subquery reads from its outer row.
	CorrelationId
);
