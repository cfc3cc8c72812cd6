mod method;
mod request;
mod response;
