//! 1-of-2 OT from the DDH assumption in the common reference string model, as in [A Framework for
//! Efficient and Composable Oblivious Transfer](https://eprint.iacr.org/2007/348) (the DDH
//! instantiation of the "dual mode" cryptosystem) and section 7.3 of Hazay and Lindell's book.
//!
//! Given a CRS `(g0, g1, h0, h1)` which is not a DH tuple:
//! 1. Receiver with choice `σ` samples `r` and sends `(g, h) = (g_σ * r, h_σ * r)`.
//! 2. Sender, for each branch `b`, samples `s_b, t_b` and computes
//!    `u_b = g_b * s_b + h_b * t_b` and `v_b = g * s_b + h * t_b`, then sends `(u_b, mask(x_b, v_b))`.
//! 3. Receiver unmasks `c_σ` with `u_σ * r = v_σ`. For the other branch, `v_{1-σ}` is uniformly
//!    random given the receiver's view.
//!
//! [`OTReceiver`] and [`OTSender`] hold the CRS and are reused across OTs. Each OT is a session
//! created by `preprocess` and consumed by `transfer`.

pub mod batch;
pub mod full_simulation;
pub mod messages;
pub mod receiver;
pub mod sender;

pub use full_simulation::{FullSimOTReceiver, FullSimOTSender};
pub use messages::{ReceiverMessage, SenderMessage};
pub use receiver::{OTReceiver, ReceiverSession};
pub use sender::{OTSender, SenderSession};
