mod acquisition;
mod provider;
