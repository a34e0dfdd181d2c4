use application::transfer::{SessionTokenDto, SignInDto};
use serde::Deserialize;

use crate::controller::Intake;

/// Query string Google appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    code: String,
    state: String,
}

#[derive(Debug)]
pub struct SignOutRequest {
    token: String,
}

impl SignOutRequest {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

pub struct Transformer;

impl Intake<CallbackRequest> for Transformer {
    type To = SignInDto;
    fn emit(&self, input: CallbackRequest) -> Self::To {
        SignInDto {
            code: input.code,
            state: input.state,
        }
    }
}

impl Intake<SignOutRequest> for Transformer {
    type To = SessionTokenDto;
    fn emit(&self, input: SignOutRequest) -> Self::To {
        SessionTokenDto { token: input.token }
    }
}
