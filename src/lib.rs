//! This library implements the JWT flavour of [DIF Presentation Exchange 2.0] for DID wallets.
//!
//! [DIF Presentation Exchange 2.0]: <https://identity.foundation/presentation-exchange/spec/v2.0.0/>
//!
//! # Verifier Usage
//!
//! A verifier describes the claims it needs, sends the resulting request to a holder and
//! checks the submission that comes back:
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use wallet_pex::core::did::MemoryResolver;
//! use wallet_pex::core::input_descriptor::InputFieldFilter;
//! use wallet_pex::verifier::{submission::SubmissionVerificationOptions, Verifier};
//!
//! let verifier = Verifier::builder()
//!     .with_resolver(Arc::new(resolver))
//!     .build()?;
//!
//! let request = verifier
//!     .build_definition_request()
//!     .with_claim("email", InputFieldFilter::pattern("^.+@example\\.com$"))
//!     .with_issuer("did:example:issuer")
//!     .with_jwt_alg("ES256K")
//!     .with_domain("verifier.example.com")
//!     .with_challenge(nonce)
//!     .build()?;
//!
//! // ... send `request` to the holder, receive `submission` ...
//!
//! let verified = verifier
//!     .verify_presentation_submission(&submission, &SubmissionVerificationOptions::Jwt(request))
//!     .await?;
//! ```
//!
//! Issuer keys are looked up with a [`DidResolver`]. [`UniversalResolver`] talks to a DIF
//! universal resolver over any [`AsyncHttpClient`]; [`Verifier::from_config`] wires one up
//! from a [`Config`].
//!
//! [`DidResolver`]: crate::core::did::DidResolver
//! [`UniversalResolver`]: crate::core::did::universal::UniversalResolver
//! [`AsyncHttpClient`]: crate::core::util::AsyncHttpClient
//! [`Verifier::from_config`]: crate::verifier::Verifier::from_config
//! [`Config`]: crate::config::Config
//!
//! # Holder Usage
//!
//! ```ignore
//! use wallet_pex::core::credential::{Credential, JwtCredential};
//! use wallet_pex::holder::Holder;
//!
//! let credential: Credential = JwtCredential::parse(vc_jwt)?.into();
//! let submission = Holder::new().create_presentation_submission(&request, &credential, &key)?;
//! ```
//!
//! # Protocol Overview
//!
//! 1. *Definition request*: the verifier builds a [`PresentationDefinitionRequest`] with one
//!    input descriptor listing the required claims, their filters and a challenge.
//! 2. *Submission*: the holder wraps a JWT credential in an ES256K-signed presentation bound to
//!    the challenge and domain, and maps it to each input descriptor in a
//!    [`PresentationSubmission`].
//! 3. *Verification*: the verifier follows the descriptor map into the presentation and the
//!    credential inside it, checks the bindings and the issuer signature, and evaluates every
//!    required field with [`DescriptorPath`].
//!
//! [`PresentationDefinitionRequest`]: crate::core::presentation_definition::PresentationDefinitionRequest
//! [`PresentationSubmission`]: crate::core::presentation_submission::PresentationSubmission
//! [`DescriptorPath`]: crate::core::descriptor_path::DescriptorPath

pub mod config;
pub mod core;
pub mod holder;
pub mod utils;
pub mod verifier;
