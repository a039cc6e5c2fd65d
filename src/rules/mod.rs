/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Check and pin detection.
mod check;

/// Squares each piece, and each side, could capture on.
mod defense;

/// Legal destination sets per piece.
mod movegen;

pub use check::*;
pub use defense::*;
pub use movegen::*;
