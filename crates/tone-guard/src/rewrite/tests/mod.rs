mod rephrase;
